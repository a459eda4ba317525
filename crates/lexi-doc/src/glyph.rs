#![forbid(unsafe_code)]

//! Glyph arena.
//!
//! Every glyph of a document lives in one [`GlyphTree`], a generational slab
//! addressed by [`GlyphId`]. Containers own their children through ordered
//! child lists; nothing points back up. A glyph is either *attached* (listed
//! by exactly one container) or *detached* (freshly created, cloned into the
//! clipboard, or waiting to be inserted).
//!
//! # Invariants
//!
//! 1. Positions and sizes stored in the tree are never negative.
//! 2. An attached glyph appears in exactly one child list.
//! 3. Rows hold Characters, Columns hold Rows, Pages hold Columns.
//! 4. Releasing a glyph releases its whole subtree and bumps the slot
//!    generation, so old handles report [`EditorError::GlyphNotFound`].

use std::fmt;

use smallvec::SmallVec;

use lexi_core::{EditorError, GlyphId, Point, Rect, Result};

// =========================================================================
// GlyphKind
// =========================================================================

/// Closed set of glyph variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GlyphKind {
    /// Leaf holding one symbol.
    Character(char),
    Row,
    Column,
    Page,
}

impl GlyphKind {
    /// Lowercase variant name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Character(_) => "character",
            Self::Row => "row",
            Self::Column => "column",
            Self::Page => "page",
        }
    }

    #[must_use]
    pub const fn is_container(&self) -> bool {
        !matches!(self, Self::Character(_))
    }

    /// The symbol of a Character, `None` for containers.
    #[must_use]
    pub const fn symbol(&self) -> Option<char> {
        match self {
            Self::Character(c) => Some(*c),
            _ => None,
        }
    }

    /// Whether a container of this kind may hold a child of `child` kind.
    #[must_use]
    pub const fn accepts(&self, child: &GlyphKind) -> bool {
        matches!(
            (self, child),
            (Self::Row, Self::Character(_)) | (Self::Column, Self::Row) | (Self::Page, Self::Column)
        )
    }
}

impl fmt::Display for GlyphKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Character(c) => write!(f, "character '{c}'"),
            other => f.write_str(other.name()),
        }
    }
}

// =========================================================================
// Nodes and slots
// =========================================================================

pub(crate) type Children = SmallVec<[GlyphId; 4]>;

#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) kind: GlyphKind,
    pub(crate) bounds: Rect,
    pub(crate) children: Children,
    pub(crate) attached: bool,
}

impl Node {
    fn new(kind: GlyphKind, bounds: Rect) -> Self {
        Self {
            kind,
            bounds,
            children: Children::new(),
            attached: false,
        }
    }
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

// =========================================================================
// GlyphTree
// =========================================================================

/// Arena holding every glyph of a document.
#[derive(Clone, Default)]
pub struct GlyphTree {
    slots: Vec<Slot>,
    free: Vec<u32>,
    live: usize,
}

impl fmt::Debug for GlyphTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlyphTree")
            .field("live", &self.live)
            .field("slots", &self.slots.len())
            .field("free", &self.free.len())
            .finish()
    }
}

impl GlyphTree {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live glyphs, attached or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.live
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Whether `id` still refers to a live glyph.
    #[must_use]
    pub fn contains(&self, id: GlyphId) -> bool {
        self.node(id).is_ok()
    }

    // ---------------------------------------------------------------------
    // Slab plumbing
    // ---------------------------------------------------------------------

    pub(crate) fn alloc(&mut self, node: Node) -> GlyphId {
        self.live += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(node);
            return GlyphId::from_parts(index, slot.generation);
        }
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            node: Some(node),
        });
        GlyphId::from_parts(index, 0)
    }

    pub(crate) fn node(&self, id: GlyphId) -> Result<&Node> {
        self.slots
            .get(id.index() as usize)
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.node.as_ref())
            .ok_or(EditorError::GlyphNotFound(id))
    }

    pub(crate) fn node_mut(&mut self, id: GlyphId) -> Result<&mut Node> {
        self.slots
            .get_mut(id.index() as usize)
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.node.as_mut())
            .ok_or(EditorError::GlyphNotFound(id))
    }

    /// Free `id` and its whole subtree. Stale ids are ignored.
    pub(crate) fn release(&mut self, id: GlyphId) {
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            let Some(slot) = self
                .slots
                .get_mut(next.index() as usize)
                .filter(|slot| slot.generation == next.generation())
            else {
                continue;
            };
            if let Some(node) = slot.node.take() {
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(next.index());
                self.live -= 1;
                stack.extend(node.children);
            }
        }
    }

    // ---------------------------------------------------------------------
    // Construction
    // ---------------------------------------------------------------------

    /// Create a detached Character.
    ///
    /// # Errors
    ///
    /// [`EditorError::InvalidGeometry`] if `bounds` has a negative component.
    pub fn character(&mut self, symbol: char, bounds: Rect) -> Result<GlyphId> {
        bounds.validate()?;
        Ok(self.alloc(Node::new(GlyphKind::Character(symbol), bounds)))
    }

    /// Create a detached, empty Row.
    ///
    /// # Errors
    ///
    /// [`EditorError::InvalidGeometry`] if `bounds` has a negative component.
    pub fn row(&mut self, bounds: Rect) -> Result<GlyphId> {
        bounds.validate()?;
        Ok(self.alloc(Node::new(GlyphKind::Row, bounds)))
    }

    /// Create a detached Column holding its first Row of height `row_height`.
    ///
    /// # Errors
    ///
    /// [`EditorError::InvalidGeometry`] if `bounds` or `row_height` is negative.
    pub fn column(&mut self, bounds: Rect, row_height: i32) -> Result<GlyphId> {
        bounds.validate()?;
        let first = Rect::new(bounds.x, bounds.y, bounds.width, row_height);
        first.validate()?;
        Ok(self.column_unchecked(bounds, first))
    }

    /// Create a detached Page holding one Column (at `column`) and one Row.
    ///
    /// # Errors
    ///
    /// [`EditorError::InvalidGeometry`] if any rectangle or `row_height` is negative.
    pub fn page(&mut self, bounds: Rect, column: Rect, row_height: i32) -> Result<GlyphId> {
        bounds.validate()?;
        let column = self.column(column, row_height)?;
        Ok(self.page_unchecked(bounds, column))
    }

    pub(crate) fn column_unchecked(&mut self, bounds: Rect, first_row: Rect) -> GlyphId {
        let mut row = Node::new(GlyphKind::Row, first_row);
        row.attached = true;
        let row = self.alloc(row);
        let mut column = Node::new(GlyphKind::Column, bounds);
        column.children.push(row);
        self.alloc(column)
    }

    pub(crate) fn page_unchecked(&mut self, bounds: Rect, column: GlyphId) -> GlyphId {
        if let Ok(node) = self.node_mut(column) {
            node.attached = true;
        }
        let mut page = Node::new(GlyphKind::Page, bounds);
        page.children.push(column);
        self.alloc(page)
    }

    /// Deep copy of `id` with identical geometry and content, detached.
    ///
    /// # Errors
    ///
    /// [`EditorError::GlyphNotFound`] if `id` is stale.
    pub fn clone_glyph(&mut self, id: GlyphId) -> Result<GlyphId> {
        let node = self.node(id)?;
        let mut copy = Node::new(node.kind, node.bounds);
        let children = node.children.clone();
        for child in children {
            let child_copy = self.clone_glyph(child)?;
            self.node_mut(child_copy)?.attached = true;
            copy.children.push(child_copy);
        }
        Ok(self.alloc(copy))
    }

    /// Free a detached glyph and its subtree.
    ///
    /// # Errors
    ///
    /// [`EditorError::AlreadyAttached`] if a container still lists it.
    pub fn discard(&mut self, id: GlyphId) -> Result<()> {
        if self.node(id)?.attached {
            return Err(EditorError::AlreadyAttached(id));
        }
        self.release(id);
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Accessors
    // ---------------------------------------------------------------------

    pub fn kind(&self, id: GlyphId) -> Result<GlyphKind> {
        Ok(self.node(id)?.kind)
    }

    pub fn bounds(&self, id: GlyphId) -> Result<Rect> {
        Ok(self.node(id)?.bounds)
    }

    pub fn position(&self, id: GlyphId) -> Result<Point> {
        Ok(self.node(id)?.bounds.origin())
    }

    pub fn width(&self, id: GlyphId) -> Result<i32> {
        Ok(self.node(id)?.bounds.width)
    }

    pub fn height(&self, id: GlyphId) -> Result<i32> {
        Ok(self.node(id)?.bounds.height)
    }

    /// `x + width`.
    pub fn right_border(&self, id: GlyphId) -> Result<i32> {
        Ok(self.node(id)?.bounds.right())
    }

    /// `y + height`.
    pub fn bottom_border(&self, id: GlyphId) -> Result<i32> {
        Ok(self.node(id)?.bounds.bottom())
    }

    pub fn is_attached(&self, id: GlyphId) -> Result<bool> {
        Ok(self.node(id)?.attached)
    }

    /// Ordered children of a container (empty for Characters).
    pub fn children(&self, id: GlyphId) -> Result<&[GlyphId]> {
        Ok(&self.node(id)?.children)
    }

    /// `id` and all its descendants, parents before children.
    pub fn subtree(&self, id: GlyphId) -> Result<Vec<GlyphId>> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            let node = self.node(next)?;
            out.push(next);
            stack.extend(node.children.iter().rev().copied());
        }
        Ok(out)
    }

    /// Characters below `id` (or `id` itself) in child order.
    pub fn characters(&self, id: GlyphId) -> Result<Vec<GlyphId>> {
        let mut out = Vec::new();
        for glyph in self.subtree(id)? {
            if matches!(self.node(glyph)?.kind, GlyphKind::Character(_)) {
                out.push(glyph);
            }
        }
        Ok(out)
    }

    /// Direct container of `glyph` within the subtree rooted at `root`, with
    /// the glyph's index in that container.
    pub fn parent_of(&self, root: GlyphId, glyph: GlyphId) -> Result<Option<(GlyphId, usize)>> {
        for candidate in self.subtree(root)? {
            let node = self.node(candidate)?;
            if let Some(index) = node.children.iter().position(|c| *c == glyph) {
                return Ok(Some((candidate, index)));
            }
        }
        Ok(None)
    }

    // ---------------------------------------------------------------------
    // Hit testing
    // ---------------------------------------------------------------------

    /// Inclusive point test against the glyph's bounds.
    pub fn intersects_point(&self, id: GlyphId, point: Point) -> Result<bool> {
        Ok(self.node(id)?.bounds.contains(point))
    }

    /// Inclusive overlap test between two glyphs.
    pub fn intersects(&self, a: GlyphId, b: GlyphId) -> Result<bool> {
        Ok(self.node(a)?.bounds.intersects(&self.node(b)?.bounds))
    }

    // ---------------------------------------------------------------------
    // Geometry mutators
    // ---------------------------------------------------------------------

    /// Translate the glyph and all its descendants.
    ///
    /// # Errors
    ///
    /// [`EditorError::InvalidGeometry`] if any glyph in the subtree would end
    /// up at a negative position or past `i32::MAX`. Nothing moves in that
    /// case.
    pub fn move_glyph(&mut self, id: GlyphId, dx: i32, dy: i32) -> Result<()> {
        let subtree = self.subtree(id)?;
        let mut moved = Vec::with_capacity(subtree.len());
        for glyph in &subtree {
            let bounds = self.node(*glyph)?.bounds.translate(dx, dy)?;
            bounds.validate()?;
            moved.push(bounds);
        }
        for (glyph, bounds) in subtree.into_iter().zip(moved) {
            self.node_mut(glyph)?.bounds = bounds;
        }
        Ok(())
    }

    /// Move the glyph's origin to `point`, carrying descendants along.
    pub fn set_position(&mut self, id: GlyphId, point: Point) -> Result<()> {
        let current = self.bounds(id)?;
        match (point.x.checked_sub(current.x), point.y.checked_sub(current.y)) {
            (Some(dx), Some(dy)) => self.move_glyph(id, dx, dy),
            _ => Err(EditorError::InvalidGeometry {
                x: point.x,
                y: point.y,
                width: current.width,
                height: current.height,
            }),
        }
    }

    pub fn set_width(&mut self, id: GlyphId, width: i32) -> Result<()> {
        let bounds = self.bounds(id)?;
        self.set_params(id, Rect { width, ..bounds })
    }

    pub fn set_height(&mut self, id: GlyphId, height: i32) -> Result<()> {
        let bounds = self.bounds(id)?;
        self.set_params(id, Rect { height, ..bounds })
    }

    /// Replace the glyph's own bounds. Descendants are not moved.
    ///
    /// # Errors
    ///
    /// [`EditorError::InvalidGeometry`] on any negative component.
    pub fn set_params(&mut self, id: GlyphId, bounds: Rect) -> Result<()> {
        bounds.validate()?;
        self.node_mut(id)?.bounds = bounds;
        Ok(())
    }
}
