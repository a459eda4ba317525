#![forbid(unsafe_code)]

//! The document: pages, cursor, clipboard, and the active compositor.
//!
//! # Invariants
//!
//! 1. There is always at least one page and the first page is never removed.
//! 2. The cursor is always an attached Row or Character of this document.
//! 3. The clipboard holds detached clones; tree edits never reach them.
//! 4. After every structural edit the tree is re-composed in full.
//!
//! # Cursor model
//!
//! A Character cursor means "after this character"; a Row cursor means
//! "at the start of this row". Movement and re-anchoring follow document
//! order (pages, then rows, then characters).

use std::fmt;

use lexi_core::{EditorError, GlyphId, Point, Rect, Result};
use lexi_layout::{Compositor, Size};

use crate::glyph::{GlyphKind, GlyphTree};
use crate::render::{DrawItem, DrawKind, RenderSink};
use crate::snapshot::{CharacterSnapshot, DocumentSnapshot, PageSnapshot, RowSnapshot};

/// Row heights of a composed document, grouped by page.
///
/// Rows keep their height across re-layouts, so an exact undo has to put the old
/// heights back. Capture before an edit, restore after reverting it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LayoutState {
    row_heights: Vec<Vec<i32>>,
}

impl LayoutState {
    #[must_use]
    pub fn row_heights(&self) -> &[Vec<i32>] {
        &self.row_heights
    }
}

pub struct Document {
    tree: GlyphTree,
    pages: Vec<GlyphId>,
    current_page: GlyphId,
    cursor: GlyphId,
    clipboard: Vec<GlyphId>,
    compositor: Compositor,
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("pages", &self.pages.len())
            .field("cursor", &self.cursor)
            .field("clipboard", &self.clipboard.len())
            .field("compositor", &self.compositor)
            .field("tree", &self.tree)
            .finish()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new(Compositor::default())
    }
}

impl Document {
    /// Create a document with one empty page laid out by `compositor`.
    #[must_use]
    pub fn new(compositor: Compositor) -> Self {
        let mut tree = GlyphTree::new();
        let page = Self::blank_page(&mut tree, &compositor);
        let cursor = Self::first_row_of(&tree, page).unwrap_or(page);
        Self {
            tree,
            pages: vec![page],
            current_page: page,
            cursor,
            clipboard: Vec::new(),
            compositor,
        }
    }

    fn blank_page(tree: &mut GlyphTree, compositor: &Compositor) -> GlyphId {
        let column = tree.column_unchecked(compositor.column_rect(), compositor.first_row_rect());
        let page = tree.page_unchecked(compositor.page_rect(), column);
        if let Ok(node) = tree.node_mut(page) {
            node.attached = true;
        }
        page
    }

    fn first_row_of(tree: &GlyphTree, page: GlyphId) -> Option<GlyphId> {
        let column = tree.first_glyph(page).ok()??;
        tree.first_glyph(column).ok()?
    }

    fn first_row(&self) -> GlyphId {
        Self::first_row_of(&self.tree, self.pages[0]).unwrap_or(self.pages[0])
    }

    // =====================================================================
    // Accessors
    // =====================================================================

    /// Read-only view of the glyph arena.
    #[must_use]
    pub fn tree(&self) -> &GlyphTree {
        &self.tree
    }

    #[must_use]
    pub fn compositor(&self) -> &Compositor {
        &self.compositor
    }

    /// Swap the layout strategy and re-compose.
    pub fn set_compositor(&mut self, compositor: Compositor) -> Result<()> {
        self.compositor = compositor;
        self.compose()
    }

    /// The cursor glyph.
    #[must_use]
    pub fn selected_glyph(&self) -> GlyphId {
        self.cursor
    }

    #[must_use]
    pub fn first_page(&self) -> GlyphId {
        self.pages[0]
    }

    /// Page after `page`, `None` for the last one.
    pub fn next_page(&self, page: GlyphId) -> Result<Option<GlyphId>> {
        let index = self
            .pages
            .iter()
            .position(|p| *p == page)
            .ok_or(EditorError::GlyphNotFound(page))?;
        Ok(self.pages.get(index + 1).copied())
    }

    #[must_use]
    pub fn pages_count(&self) -> usize {
        self.pages.len()
    }

    #[must_use]
    pub fn page(&self, index: usize) -> Option<GlyphId> {
        self.pages.get(index).copied()
    }

    #[must_use]
    pub fn pages(&self) -> &[GlyphId] {
        &self.pages
    }

    /// Page receiving positional inserts and selections.
    #[must_use]
    pub fn current_page(&self) -> GlyphId {
        self.current_page
    }

    pub fn set_current_page(&mut self, page: GlyphId) -> Result<()> {
        if !self.pages.contains(&page) {
            return Err(EditorError::GlyphNotFound(page));
        }
        self.current_page = page;
        Ok(())
    }

    /// Position of the current page in page order.
    ///
    /// Page glyphs are re-created when a page is pruned and re-composed, so
    /// the index is what survives an undo.
    #[must_use]
    pub fn current_page_index(&self) -> usize {
        self.pages
            .iter()
            .position(|page| *page == self.current_page)
            .unwrap_or(0)
    }

    /// Make the page at `index` current.
    ///
    /// # Errors
    ///
    /// [`EditorError::NullGlyph`] when there is no page at `index`.
    pub fn set_current_page_index(&mut self, index: usize) -> Result<()> {
        let page = self.page(index).ok_or(EditorError::NullGlyph)?;
        self.current_page = page;
        tracing::trace!(target: "lexi.doc", index, "current page set");
        Ok(())
    }

    /// Rows of the first column of `page`.
    pub fn rows(&self, page: GlyphId) -> Result<Vec<GlyphId>> {
        let column = self
            .tree
            .first_glyph(page)?
            .ok_or(EditorError::GlyphNotFound(page))?;
        Ok(self.tree.children(column)?.to_vec())
    }

    /// Every attached Character in document order.
    #[must_use]
    pub fn characters(&self) -> Vec<GlyphId> {
        let mut out = Vec::new();
        for page in &self.pages {
            if let Ok(chars) = self.tree.characters(*page) {
                out.extend(chars);
            }
        }
        out
    }

    /// Concatenated symbols in document order.
    #[must_use]
    pub fn text(&self) -> String {
        self.characters()
            .into_iter()
            .filter_map(|id| self.tree.kind(id).ok().and_then(|k| k.symbol()))
            .collect()
    }

    /// Create a detached Character in this document's arena.
    pub fn create_character(&mut self, symbol: char, bounds: Rect) -> Result<GlyphId> {
        self.tree.character(symbol, bounds)
    }

    /// Free a detached glyph that will not be inserted after all.
    pub fn discard(&mut self, glyph: GlyphId) -> Result<()> {
        self.tree.discard(glyph)
    }

    // =====================================================================
    // Composition
    // =====================================================================

    fn row_heights(&self) -> Vec<Vec<i32>> {
        self.pages
            .iter()
            .map(|page| {
                self.rows(*page)
                    .unwrap_or_default()
                    .into_iter()
                    .filter_map(|row| self.tree.height(row).ok())
                    .collect()
            })
            .collect()
    }

    /// Re-flow every character through the compositor.
    pub fn compose(&mut self) -> Result<()> {
        let prior = self.row_heights();
        self.compose_with(&prior)
    }

    fn compose_with(&mut self, prior: &[Vec<i32>]) -> Result<()> {
        let _span =
            tracing::debug_span!(target: "lexi.compose", "compose", pages = self.pages.len())
                .entered();

        let chars = self.characters();
        let sizes = chars
            .iter()
            .map(|id| {
                self.tree
                    .bounds(*id)
                    .map(|b| Size::new(b.width, b.height))
            })
            .collect::<Result<Vec<_>>>()?;
        let flow = self.compositor.flow(&sizes, prior);

        for page in self.pages.clone() {
            for column in self.tree.children(page)?.to_vec() {
                for row in self.tree.children(column)?.to_vec() {
                    self.tree.node_mut(row)?.children.clear();
                }
            }
        }

        for (index, page_flow) in flow.pages.iter().enumerate() {
            let page = match self.pages.get(index) {
                Some(page) => *page,
                None => {
                    let page = Self::blank_page(&mut self.tree, &self.compositor);
                    self.pages.push(page);
                    page
                }
            };
            self.tree.node_mut(page)?.bounds = page_flow.bounds;
            let column = self
                .tree
                .first_glyph(page)?
                .ok_or(EditorError::GlyphNotFound(page))?;
            self.tree.node_mut(column)?.bounds = page_flow.column;

            let mut rows = self.tree.children(column)?.to_vec();
            while rows.len() < page_flow.rows.len() {
                let row = self.tree.row(page_flow.rows[rows.len()].bounds)?;
                self.tree.add(column, row)?;
                rows.push(row);
            }
            for (row, row_flow) in rows.iter().zip(&page_flow.rows) {
                let node = self.tree.node_mut(*row)?;
                node.bounds = row_flow.bounds;
                node.children = chars[row_flow.items.clone()].iter().copied().collect();
                for i in row_flow.items.clone() {
                    let glyph = self.tree.node_mut(chars[i])?;
                    glyph.bounds = glyph.bounds.with_origin(flow.positions[i]);
                    glyph.attached = true;
                }
            }
            let keep = page_flow.rows.len();
            self.tree.node_mut(column)?.children.truncate(keep);
            for surplus in rows.into_iter().skip(keep) {
                self.tree.release(surplus);
            }
        }

        let keep = flow.pages.len();
        for page in self.pages.split_off(keep) {
            self.tree.release(page);
        }
        self.reanchor();

        tracing::debug!(
            target: "lexi.compose",
            glyphs = chars.len(),
            pages = self.pages.len(),
            rows = flow.row_count(),
            "document composed"
        );
        Ok(())
    }

    fn reanchor(&mut self) {
        let live = self.tree.is_attached(self.cursor).unwrap_or(false)
            && self
                .tree
                .kind(self.cursor)
                .is_ok_and(|k| matches!(k, GlyphKind::Row | GlyphKind::Character(_)));
        if !live {
            self.cursor = self.first_row();
        }
        if !self.pages.contains(&self.current_page) {
            self.current_page = self.pages[0];
        }
    }

    /// Row heights as composed right now.
    #[must_use]
    pub fn layout_state(&self) -> LayoutState {
        LayoutState {
            row_heights: self.row_heights(),
        }
    }

    /// Re-compose using previously captured row heights.
    pub fn restore_layout(&mut self, state: &LayoutState) -> Result<()> {
        self.compose_with(&state.row_heights)
    }

    // =====================================================================
    // Structural edits
    // =====================================================================

    fn page_containing(&self, glyph: GlyphId) -> Option<GlyphId> {
        self.pages.iter().copied().find(|page| {
            self.tree
                .subtree(*page)
                .is_ok_and(|ids| ids.contains(&glyph))
        })
    }

    fn parent_in_document(&self, glyph: GlyphId) -> Result<(GlyphId, usize)> {
        for page in &self.pages {
            if let Some(found) = self.tree.parent_of(*page, glyph)? {
                return Ok(found);
            }
        }
        Err(EditorError::GlyphNotFound(glyph))
    }

    /// Last Character before `glyph` in document order.
    fn preceding_character(&self, glyph: GlyphId) -> Option<GlyphId> {
        let mut last = None;
        for page in &self.pages {
            for id in self.tree.subtree(*page).ok()? {
                if id == glyph {
                    return last;
                }
                if matches!(self.tree.kind(id), Ok(GlyphKind::Character(_))) {
                    last = Some(id);
                }
            }
        }
        None
    }

    /// Insert a detached Character into the current page by its position,
    /// re-compose, and move the cursor onto it.
    ///
    /// # Errors
    ///
    /// Propagates the container errors ([`EditorError::NoSuitableRow`],
    /// [`EditorError::NoSuitablePosition`], ...). The glyph stays detached.
    pub fn insert(&mut self, glyph: GlyphId) -> Result<()> {
        self.tree.insert(self.current_page, glyph)?;
        self.compose()?;
        self.cursor = glyph;
        tracing::debug!(target: "lexi.doc", %glyph, "glyph inserted");
        Ok(())
    }

    /// Create a Character and insert it by position. Nothing is left behind
    /// on failure.
    pub fn insert_character(&mut self, symbol: char, bounds: Rect) -> Result<GlyphId> {
        let glyph = self.tree.character(symbol, bounds)?;
        if let Err(err) = self.insert(glyph) {
            rollback_step("discard", self.tree.discard(glyph));
            return Err(err);
        }
        Ok(glyph)
    }

    /// Remove any glyph of the document and re-compose.
    ///
    /// If the cursor was the glyph or inside it, the cursor moves to the
    /// preceding character, or to the first row.
    ///
    /// # Errors
    ///
    /// - [`EditorError::GlyphNotFound`] if the glyph is not in the document.
    /// - [`EditorError::Pinned`] for the first page, a first column or a first row.
    pub fn remove(&mut self, glyph: GlyphId) -> Result<()> {
        let kind = self.tree.kind(glyph)?;
        let anchor = self.preceding_character(glyph);
        let cursor_lost = self.tree.subtree(glyph)?.contains(&self.cursor);

        if kind == GlyphKind::Page {
            let index = self
                .pages
                .iter()
                .position(|p| *p == glyph)
                .ok_or(EditorError::GlyphNotFound(glyph))?;
            if index == 0 {
                return Err(EditorError::Pinned(glyph));
            }
            self.pages.remove(index);
            self.tree.release(glyph);
        } else {
            let page = self
                .page_containing(glyph)
                .ok_or(EditorError::GlyphNotFound(glyph))?;
            self.tree.remove(page, glyph)?;
        }

        self.compose()?;
        if cursor_lost {
            let fallback = self.first_row();
            self.cursor = anchor.unwrap_or(fallback);
        }
        tracing::debug!(target: "lexi.doc", %glyph, kind = kind.name(), "glyph removed");
        Ok(())
    }

    fn place_at(&mut self, row: GlyphId, index: usize, glyph: GlyphId) -> Result<GlyphId> {
        if let Err(err) = self.tree.splice(row, index, glyph) {
            rollback_step("discard", self.tree.discard(glyph));
            return Err(err);
        }
        self.compose()?;
        self.cursor = glyph;
        Ok(glyph)
    }

    /// Type `symbol` at the cursor.
    ///
    /// The new Character is `char_width` by `row_height` and goes right after
    /// a Character cursor, or at the start of a Row cursor.
    pub fn insert_char(&mut self, symbol: char) -> Result<GlyphId> {
        let config = *self.compositor.config();
        let (row, index, origin) = match self.tree.kind(self.cursor)? {
            GlyphKind::Row => (self.cursor, 0, self.tree.position(self.cursor)?),
            GlyphKind::Character(_) => {
                let (row, index) = self.parent_in_document(self.cursor)?;
                let bounds = self.tree.bounds(self.cursor)?;
                (row, index + 1, Point::new(bounds.right(), bounds.y))
            }
            GlyphKind::Column | GlyphKind::Page => return Err(EditorError::NullGlyph),
        };
        let glyph = self
            .tree
            .character(symbol, Rect::at(origin, config.char_width, config.row_height))?;
        self.place_at(row, index, glyph)
    }

    /// Delete the Character under the cursor and return its symbol.
    ///
    /// # Errors
    ///
    /// [`EditorError::NullGlyph`] when the cursor sits on a Row.
    pub fn remove_char(&mut self) -> Result<char> {
        let GlyphKind::Character(symbol) = self.tree.kind(self.cursor)? else {
            return Err(EditorError::NullGlyph);
        };
        self.remove(self.cursor)?;
        Ok(symbol)
    }

    // =====================================================================
    // Cursor
    // =====================================================================

    /// Step the cursor one glyph back in document order.
    pub fn move_cursor_left(&mut self) -> GlyphId {
        let target = match self.tree.kind(self.cursor) {
            Ok(GlyphKind::Character(_)) => self
                .preceding_character(self.cursor)
                .unwrap_or_else(|| self.first_row()),
            _ => self.preceding_character(self.cursor).unwrap_or(self.cursor),
        };
        self.cursor = target;
        tracing::trace!(target: "lexi.doc", cursor = %target, "cursor left");
        target
    }

    /// Step the cursor one glyph forward in document order.
    pub fn move_cursor_right(&mut self) -> GlyphId {
        let chars = self.characters();
        let next = match self.tree.kind(self.cursor) {
            Ok(GlyphKind::Character(_)) => chars
                .iter()
                .position(|c| *c == self.cursor)
                .and_then(|i| chars.get(i + 1))
                .copied(),
            _ => chars.get(self.cursor_offset()).copied(),
        };
        if let Some(next) = next {
            self.cursor = next;
        }
        tracing::trace!(target: "lexi.doc", cursor = %self.cursor, "cursor right");
        self.cursor
    }

    /// Number of characters before the insertion point.
    #[must_use]
    pub fn cursor_offset(&self) -> usize {
        let anchor = match self.tree.kind(self.cursor) {
            Ok(GlyphKind::Character(_)) => Some(self.cursor),
            _ => self.preceding_character(self.cursor),
        };
        anchor
            .and_then(|glyph| self.offset_of(glyph).ok())
            .map_or(0, |index| index + 1)
    }

    /// Put the cursor after the `offset`-th character (clamped).
    pub fn set_cursor_offset(&mut self, offset: usize) {
        let chars = self.characters();
        self.cursor = match offset.min(chars.len()) {
            0 => self.first_row(),
            n => chars[n - 1],
        };
    }

    /// Index of a Character in document order.
    pub fn offset_of(&self, glyph: GlyphId) -> Result<usize> {
        self.characters()
            .iter()
            .position(|c| *c == glyph)
            .ok_or(EditorError::GlyphNotFound(glyph))
    }

    /// Re-create a Character so it becomes the `offset`-th one (clamped).
    pub fn insert_character_at(
        &mut self,
        offset: usize,
        character: CharacterSnapshot,
    ) -> Result<GlyphId> {
        let chars = self.characters();
        let (row, index) = match offset.min(chars.len()) {
            0 => (self.first_row(), 0),
            n => {
                let (row, index) = self.parent_in_document(chars[n - 1])?;
                (row, index + 1)
            }
        };
        let glyph = self.tree.character(character.symbol, character.bounds)?;
        self.place_at(row, index, glyph)
    }

    /// Remove the `offset`-th Character and return what it was.
    ///
    /// # Errors
    ///
    /// [`EditorError::NullGlyph`] if there is no such character.
    pub fn remove_character_at(&mut self, offset: usize) -> Result<CharacterSnapshot> {
        let glyph = *self
            .characters()
            .get(offset)
            .ok_or(EditorError::NullGlyph)?;
        let snapshot = self.character_snapshot(glyph)?;
        self.remove(glyph)?;
        Ok(snapshot)
    }

    // =====================================================================
    // Clipboard
    // =====================================================================

    /// Characters of the current page inside the rectangle spanned by
    /// `start` and `end` (end-exclusive). The clipboard receives clones.
    pub fn select_glyphs(&mut self, start: Point, end: Point) -> Result<Vec<GlyphId>> {
        let area = selection_area(start, end);
        let selected = self.tree.select(self.current_page, area)?;
        let mut clones = Vec::with_capacity(selected.len());
        for glyph in &selected {
            clones.push(self.tree.clone_glyph(*glyph)?);
        }
        self.replace_clipboard(clones);
        tracing::debug!(target: "lexi.doc", selected = selected.len(), "selection copied");
        Ok(selected)
    }

    /// Select, then remove the selection from the tree.
    ///
    /// Returns each removed character with its offset before the cut, in
    /// document order.
    pub fn cut_glyphs(
        &mut self,
        start: Point,
        end: Point,
    ) -> Result<Vec<(usize, CharacterSnapshot)>> {
        let selected = self.select_glyphs(start, end)?;
        let chars = self.characters();
        let mut removed = Vec::with_capacity(selected.len());
        for glyph in &selected {
            let offset = chars
                .iter()
                .position(|c| c == glyph)
                .ok_or(EditorError::GlyphNotFound(*glyph))?;
            removed.push((offset, self.character_snapshot(*glyph)?));
        }
        removed.sort_by_key(|(offset, _)| *offset);
        for glyph in selected {
            self.remove(glyph)?;
        }
        Ok(removed)
    }

    /// Insert fresh clones of the clipboard starting at `at`.
    ///
    /// Each copy is placed at the running point, inserted by position, and
    /// the point then moves to the copy's composed right border, one unit
    /// lower. The clipboard is kept for further pastes. A failure removes
    /// the copies pasted so far and puts the row heights back.
    pub fn paste_glyphs(&mut self, at: Point) -> Result<Vec<GlyphId>> {
        let cursor = self.cursor_offset();
        let page = self.current_page_index();
        let layout = self.layout_state();
        let mut pasted = Vec::with_capacity(self.clipboard.len());
        let mut point = at;
        for entry in self.clipboard.clone() {
            let copy = self.tree.clone_glyph(entry)?;
            let placed = self
                .tree
                .set_position(copy, point)
                .and_then(|()| self.insert(copy));
            if let Err(err) = placed {
                rollback_step("discard", self.tree.discard(copy));
                for glyph in pasted.into_iter().rev() {
                    rollback_step("remove", self.remove(glyph));
                }
                rollback_step("restore layout", self.restore_layout(&layout));
                rollback_step("restore page", self.set_current_page_index(page));
                self.set_cursor_offset(cursor);
                tracing::warn!(target: "lexi.doc", error = %err, "paste rolled back");
                return Err(err);
            }
            let bounds = self.tree.bounds(copy)?;
            point = Point::new(bounds.right(), bounds.y.saturating_add(1));
            pasted.push(copy);
        }
        Ok(pasted)
    }

    /// Detached clones held by the clipboard.
    #[must_use]
    pub fn clipboard(&self) -> &[GlyphId] {
        &self.clipboard
    }

    /// Clipboard entries as values.
    pub fn clipboard_contents(&self) -> Result<Vec<CharacterSnapshot>> {
        self.clipboard
            .iter()
            .map(|glyph| self.character_snapshot(*glyph))
            .collect()
    }

    /// Replace the clipboard with fresh glyphs built from `contents`.
    pub fn set_clipboard(&mut self, contents: &[CharacterSnapshot]) -> Result<()> {
        let mut clones = Vec::with_capacity(contents.len());
        for entry in contents {
            match self.tree.character(entry.symbol, entry.bounds) {
                Ok(glyph) => clones.push(glyph),
                Err(err) => {
                    for glyph in clones {
                        self.tree.release(glyph);
                    }
                    return Err(err);
                }
            }
        }
        self.replace_clipboard(clones);
        Ok(())
    }

    fn replace_clipboard(&mut self, clones: Vec<GlyphId>) {
        for old in std::mem::replace(&mut self.clipboard, clones) {
            self.tree.release(old);
        }
    }

    // =====================================================================
    // Hooks
    // =====================================================================

    fn character_snapshot(&self, glyph: GlyphId) -> Result<CharacterSnapshot> {
        match self.tree.kind(glyph)? {
            GlyphKind::Character(symbol) => Ok(CharacterSnapshot {
                symbol,
                bounds: self.tree.bounds(glyph)?,
            }),
            other => Err(EditorError::UnsupportedChild {
                parent: "snapshot",
                child: other.name(),
            }),
        }
    }

    /// Walk the composed tree and hand every glyph to `sink`.
    pub fn render<S: RenderSink + ?Sized>(&self, sink: &mut S) -> Result<()> {
        for (index, page) in self.pages.iter().enumerate() {
            for glyph in self.tree.subtree(*page)? {
                let kind = match self.tree.kind(glyph)? {
                    GlyphKind::Page => DrawKind::Page,
                    GlyphKind::Column => DrawKind::Column,
                    GlyphKind::Row => DrawKind::Row,
                    GlyphKind::Character(symbol) => DrawKind::Character(symbol),
                };
                sink.draw(DrawItem {
                    page: index,
                    kind,
                    bounds: self.tree.bounds(glyph)?,
                });
            }
        }
        sink.finish();
        Ok(())
    }

    /// Serializable view of the composed page tree.
    pub fn snapshot(&self) -> Result<DocumentSnapshot> {
        let mut pages = Vec::with_capacity(self.pages.len());
        for page in &self.pages {
            let column = self
                .tree
                .first_glyph(*page)?
                .ok_or(EditorError::GlyphNotFound(*page))?;
            let mut rows = Vec::new();
            for row in self.tree.children(column)? {
                let glyphs = self
                    .tree
                    .children(*row)?
                    .iter()
                    .map(|glyph| self.character_snapshot(*glyph))
                    .collect::<Result<Vec<_>>>()?;
                rows.push(RowSnapshot {
                    bounds: self.tree.bounds(*row)?,
                    glyphs,
                });
            }
            pages.push(PageSnapshot {
                bounds: self.tree.bounds(*page)?,
                column: self.tree.bounds(column)?,
                rows,
            });
        }
        Ok(DocumentSnapshot {
            config: *self.compositor.config(),
            pages,
            cursor: self.cursor_offset(),
            current_page: self.current_page_index(),
        })
    }

    /// Rebuild a document from a snapshot.
    ///
    /// # Errors
    ///
    /// [`EditorError::InvalidGeometry`] if a stored character has negative bounds.
    pub fn from_snapshot(snapshot: &DocumentSnapshot) -> Result<Self> {
        let mut doc = Self::new(Compositor::new(snapshot.config));
        let row = doc.first_row();
        for character in snapshot.characters() {
            let glyph = doc.tree.character(character.symbol, character.bounds)?;
            doc.tree.add(row, glyph)?;
        }
        doc.compose_with(&snapshot.row_heights())?;
        doc.set_cursor_offset(snapshot.cursor);
        let page = snapshot.current_page.min(doc.pages.len() - 1);
        doc.set_current_page_index(page)?;
        Ok(doc)
    }
}

/// Log a failed cleanup step. The caller still reports its original error.
fn rollback_step(step: &'static str, result: Result<()>) {
    if let Err(err) = result {
        tracing::warn!(target: "lexi.doc", step, error = %err, "rollback step failed");
    }
}

/// End-exclusive rectangle spanned by two corners.
fn selection_area(start: Point, end: Point) -> Rect {
    let (x0, x1) = (start.x.min(end.x), start.x.max(end.x));
    let (y0, y1) = (start.y.min(end.y), start.y.max(end.y));
    let extent = |lo: i32, hi: i32| {
        if hi > lo {
            hi.saturating_sub(lo).saturating_sub(1)
        } else {
            0
        }
    };
    Rect::new(x0, y0, extent(x0, x1), extent(y0, y1))
}
