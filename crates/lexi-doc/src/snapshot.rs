#![forbid(unsafe_code)]

//! Serializable view of a document for the persistence hook.
//!
//! A snapshot records the composed page tree (pages, rows, characters with
//! their bounds), the layout settings, and the cursor as a character offset.
//! Storage format is left to whoever implements the store.

use serde::{Deserialize, Serialize};

use lexi_core::Rect;
use lexi_layout::CompositorConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterSnapshot {
    pub symbol: char,
    pub bounds: Rect,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowSnapshot {
    pub bounds: Rect,
    pub glyphs: Vec<CharacterSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSnapshot {
    pub bounds: Rect,
    pub column: Rect,
    pub rows: Vec<RowSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSnapshot {
    pub config: CompositorConfig,
    pub pages: Vec<PageSnapshot>,
    /// Number of characters before the cursor.
    pub cursor: usize,
    /// Index of the page receiving positional edits.
    #[serde(default)]
    pub current_page: usize,
}

impl DocumentSnapshot {
    /// All characters in document order.
    pub fn characters(&self) -> impl Iterator<Item = &CharacterSnapshot> {
        self.pages
            .iter()
            .flat_map(|p| p.rows.iter())
            .flat_map(|r| r.glyphs.iter())
    }

    /// The document's text, symbols concatenated in order.
    #[must_use]
    pub fn text(&self) -> String {
        self.characters().map(|c| c.symbol).collect()
    }

    /// Row heights grouped by page.
    #[must_use]
    pub fn row_heights(&self) -> Vec<Vec<i32>> {
        self.pages
            .iter()
            .map(|p| p.rows.iter().map(|r| r.bounds.height).collect())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Document;
    use lexi_layout::{Compositor, Sides};

    fn two_pages() -> Document {
        let compositor = Compositor::default()
            .margins(Sides::new(10, 40, 20, 30))
            .line_spacing(100);
        let mut doc = Document::new(compositor);
        doc.insert_character('a', Rect::new(30, 10, 150, 1000)).unwrap();
        doc.insert_character('b', Rect::new(180, 10, 150, 1000)).unwrap();
        doc.insert_character('c', Rect::new(330, 10, 150, 5)).unwrap();
        doc.set_current_page_index(1).unwrap();
        doc
    }

    #[test]
    fn json_round_trip_keeps_every_field() {
        let snapshot = two_pages().snapshot().unwrap();
        assert_eq!(snapshot.pages.len(), 2);
        assert_eq!(snapshot.current_page, 1);

        let json = serde_json::to_string(&snapshot).unwrap();
        let back: DocumentSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
        assert_eq!(back.text(), "abc");
        assert_eq!(back.config.line_spacing, 100);
        assert_eq!(back.row_heights(), snapshot.row_heights());
    }

    #[test]
    fn missing_current_page_defaults_to_first() {
        let snapshot = two_pages().snapshot().unwrap();
        let mut value = serde_json::to_value(&snapshot).unwrap();
        let removed = value
            .as_object_mut()
            .and_then(|fields| fields.remove("current_page"));
        assert_eq!(removed, Some(serde_json::json!(1)));

        let back: DocumentSnapshot = serde_json::from_value(value).unwrap();
        assert_eq!(back.current_page, 0);
        assert_eq!(back.pages, snapshot.pages);
    }
}
