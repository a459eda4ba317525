#![forbid(unsafe_code)]

//! Render hook.
//!
//! The document never draws. It walks its finished layout and hands each
//! glyph's geometry to a [`RenderSink`] supplied by the display layer.

use lexi_core::Rect;

/// What is being drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawKind {
    Page,
    Column,
    Row,
    Character(char),
}

/// One draw call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawItem {
    /// Zero-based index of the page this item belongs to.
    pub page: usize,
    pub kind: DrawKind,
    pub bounds: Rect,
}

/// Receiver of finished glyph geometry.
pub trait RenderSink {
    fn draw(&mut self, item: DrawItem);

    /// Called once after the last item of a pass.
    fn finish(&mut self) {}
}

impl RenderSink for Vec<DrawItem> {
    fn draw(&mut self, item: DrawItem) {
        self.push(item);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec_sink_collects_in_order() {
        let mut sink: Vec<DrawItem> = Vec::new();
        sink.draw(DrawItem {
            page: 0,
            kind: DrawKind::Page,
            bounds: Rect::new(0, 0, 10, 10),
        });
        sink.draw(DrawItem {
            page: 0,
            kind: DrawKind::Character('x'),
            bounds: Rect::new(1, 1, 1, 1),
        });
        sink.finish();
        assert_eq!(sink.len(), 2);
        assert_eq!(sink[1].kind, DrawKind::Character('x'));
    }
}
