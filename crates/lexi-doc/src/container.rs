#![forbid(unsafe_code)]

//! Container operations on the glyph arena.
//!
//! Each container level has its own placement rule:
//!
//! - **Row** places a Character by its x coordinate: after the child whose
//!   right border equals it, else before the child whose span contains it.
//! - **Column** hands the glyph to the first Row it intersects.
//! - **Page** hands the glyph to its first Column.
//!
//! Insertion never repositions siblings; re-layout is the compositor's job.

use lexi_core::{EditorError, GlyphId, Rect, Result};

use crate::glyph::{GlyphKind, GlyphTree};

impl GlyphTree {
    fn ensure_detached(&self, glyph: GlyphId) -> Result<GlyphKind> {
        let node = self.node(glyph)?;
        if node.attached {
            return Err(EditorError::AlreadyAttached(glyph));
        }
        Ok(node.kind)
    }

    fn ensure_accepts(&self, container: GlyphId, child: GlyphKind) -> Result<GlyphKind> {
        let kind = self.kind(container)?;
        if !kind.accepts(&child) {
            return Err(EditorError::UnsupportedChild {
                parent: kind.name(),
                child: child.name(),
            });
        }
        Ok(kind)
    }

    /// Splice a detached glyph into `container` at `index`, growing a Row's
    /// height to fit.
    pub(crate) fn splice(&mut self, container: GlyphId, index: usize, glyph: GlyphId) -> Result<()> {
        let child = self.ensure_detached(glyph)?;
        let kind = self.ensure_accepts(container, child)?;
        let height = self.height(glyph)?;
        let node = self.node_mut(container)?;
        let index = index.min(node.children.len());
        node.children.insert(index, glyph);
        if kind == GlyphKind::Row {
            node.bounds.height = node.bounds.height.max(height);
        }
        self.node_mut(glyph)?.attached = true;
        tracing::trace!(target: "lexi.tree", %container, %glyph, index, "glyph spliced");
        Ok(())
    }

    /// Append a detached glyph to `container` without positional search.
    ///
    /// # Errors
    ///
    /// - [`EditorError::AlreadyAttached`] if the glyph is in a container.
    /// - [`EditorError::UnsupportedChild`] if the kinds do not nest.
    pub fn add(&mut self, container: GlyphId, glyph: GlyphId) -> Result<()> {
        let len = self.node(container)?.children.len();
        self.splice(container, len, glyph)
    }

    /// Insert a detached Character by position.
    ///
    /// # Errors
    ///
    /// - [`EditorError::NoSuitablePosition`] when a non-empty Row has no child
    ///   adjacent to or spanning the glyph's x.
    /// - [`EditorError::NoSuitableRow`] when no Row of a Column intersects it.
    /// - [`EditorError::UnsupportedChild`] when `container` is a Character or
    ///   `glyph` is not one.
    pub fn insert(&mut self, container: GlyphId, glyph: GlyphId) -> Result<()> {
        let child = self.ensure_detached(glyph)?;
        let kind = self.kind(container)?;
        let unsupported = EditorError::UnsupportedChild {
            parent: kind.name(),
            child: child.name(),
        };
        if !matches!(child, GlyphKind::Character(_)) {
            return Err(unsupported);
        }
        match kind {
            GlyphKind::Row => self.insert_into_row(container, glyph),
            GlyphKind::Column => {
                let bounds = self.bounds(glyph)?;
                let row = self
                    .children(container)?
                    .iter()
                    .copied()
                    .find(|row| {
                        self.bounds(*row)
                            .map(|b| b.intersects(&bounds))
                            .unwrap_or(false)
                    })
                    .ok_or(EditorError::NoSuitableRow {
                        column: container,
                        x: bounds.x,
                        y: bounds.y,
                    })?;
                self.insert_into_row(row, glyph)
            }
            GlyphKind::Page => {
                let column = self
                    .first_glyph(container)?
                    .ok_or(EditorError::NullGlyph)?;
                self.insert(column, glyph)
            }
            GlyphKind::Character(_) => Err(unsupported),
        }
    }

    fn insert_into_row(&mut self, row: GlyphId, glyph: GlyphId) -> Result<()> {
        let x = self.position(glyph)?.x;
        let children = self.children(row)?;
        if children.is_empty() {
            return self.splice(row, 0, glyph);
        }
        let mut after = None;
        let mut before = None;
        for (index, child) in children.iter().enumerate() {
            let bounds = self.bounds(*child)?;
            if after.is_none() && bounds.right() == x {
                after = Some(index + 1);
            }
            if before.is_none() && bounds.spans_x(x) {
                before = Some(index);
            }
        }
        match after.or(before) {
            Some(index) => self.splice(row, index, glyph),
            None => Err(EditorError::NoSuitablePosition { row, x }),
        }
    }

    /// Remove `glyph` from the subtree of `container` and release it.
    ///
    /// Rows keep existing when their last Character goes. A Column's first
    /// Row and a Page's first Column are pinned.
    ///
    /// # Errors
    ///
    /// - [`EditorError::GlyphNotFound`] if `glyph` is not below `container`.
    /// - [`EditorError::Pinned`] for a first Row or first Column.
    pub fn remove(&mut self, container: GlyphId, glyph: GlyphId) -> Result<()> {
        let kind = self.kind(container)?;
        let index = self.children(container)?.iter().position(|c| *c == glyph);
        match (kind, index) {
            (GlyphKind::Column | GlyphKind::Page, Some(0)) => Err(EditorError::Pinned(glyph)),
            (_, Some(index)) => {
                self.node_mut(container)?.children.remove(index);
                self.release(glyph);
                tracing::trace!(target: "lexi.tree", %container, %glyph, "glyph removed");
                Ok(())
            }
            (GlyphKind::Character(_) | GlyphKind::Row, None) => {
                Err(EditorError::GlyphNotFound(glyph))
            }
            (GlyphKind::Column | GlyphKind::Page, None) => {
                let children = self.children(container)?.to_vec();
                for child in children {
                    if self.subtree(child)?.contains(&glyph) {
                        return self.remove(child, glyph);
                    }
                }
                Err(EditorError::GlyphNotFound(glyph))
            }
        }
    }

    /// Leaf glyphs intersecting `area`, in child order.
    ///
    /// Every intersecting child but the last is taken whole; the last one is
    /// clipped against `area` itself.
    pub fn select(&self, container: GlyphId, area: Rect) -> Result<Vec<GlyphId>> {
        let node = self.node(container)?;
        if !node.kind.is_container() {
            return Ok(vec![container]);
        }
        let mut hits = Vec::new();
        for child in &node.children {
            let bounds = self.bounds(*child)?;
            if bounds.intersects(&area) {
                hits.push((*child, bounds));
            }
        }
        let mut out = Vec::new();
        let last = hits.len().saturating_sub(1);
        for (index, (child, bounds)) in hits.into_iter().enumerate() {
            let region = if index == last { area } else { bounds };
            out.extend(self.select(child, region)?);
        }
        Ok(out)
    }

    // ---------------------------------------------------------------------
    // Index lookups
    // ---------------------------------------------------------------------

    /// Position of `glyph` among the children of `container`.
    ///
    /// # Errors
    ///
    /// [`EditorError::GlyphNotFound`] if it is not a direct child.
    pub fn glyph_index(&self, container: GlyphId, glyph: GlyphId) -> Result<usize> {
        self.children(container)?
            .iter()
            .position(|c| *c == glyph)
            .ok_or(EditorError::GlyphNotFound(glyph))
    }

    /// Child at `index`, `None` when out of range.
    pub fn glyph_at(&self, container: GlyphId, index: usize) -> Result<Option<GlyphId>> {
        Ok(self.children(container)?.get(index).copied())
    }

    pub fn first_glyph(&self, container: GlyphId) -> Result<Option<GlyphId>> {
        Ok(self.children(container)?.first().copied())
    }

    pub fn last_glyph(&self, container: GlyphId) -> Result<Option<GlyphId>> {
        Ok(self.children(container)?.last().copied())
    }

    /// Sibling after `glyph`, `None` at the end.
    pub fn next_glyph(&self, container: GlyphId, glyph: GlyphId) -> Result<Option<GlyphId>> {
        let index = self.glyph_index(container, glyph)?;
        self.glyph_at(container, index + 1)
    }

    /// Sibling before `glyph`, `None` at the start.
    pub fn previous_glyph(&self, container: GlyphId, glyph: GlyphId) -> Result<Option<GlyphId>> {
        let index = self.glyph_index(container, glyph)?;
        match index.checked_sub(1) {
            Some(prev) => self.glyph_at(container, prev),
            None => Ok(None),
        }
    }

    // ---------------------------------------------------------------------
    // Space accounting
    // ---------------------------------------------------------------------

    /// Sum of child widths for a Row or a Page, sum of child heights for a
    /// Column, zero for a Character.
    pub fn used_space(&self, container: GlyphId) -> Result<i32> {
        let node = self.node(container)?;
        let mut used = 0;
        for child in &node.children {
            let bounds = self.bounds(*child)?;
            used += match node.kind {
                GlyphKind::Column => bounds.height,
                _ => bounds.width,
            };
        }
        Ok(used)
    }

    /// Nominal extent minus used space. Negative when content overflows.
    pub fn free_space(&self, container: GlyphId) -> Result<i32> {
        let node = self.node(container)?;
        let extent = match node.kind {
            GlyphKind::Column => node.bounds.height,
            _ => node.bounds.width,
        };
        Ok(extent - self.used_space(container)?)
    }

    pub fn is_full(&self, container: GlyphId) -> Result<bool> {
        Ok(self.free_space(container)? <= 0)
    }

    pub fn is_empty_container(&self, container: GlyphId) -> Result<bool> {
        Ok(self.children(container)?.is_empty())
    }
}
