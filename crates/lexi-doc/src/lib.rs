#![forbid(unsafe_code)]

//! Document model for the Lexi editor core.
//!
//! Glyphs live in a generational arena ([`GlyphTree`]) and nest strictly as
//! Page > Column > Row > Character. A [`Document`] owns the arena, the page
//! list, the cursor and the clipboard, and re-composes the whole tree through
//! a [`lexi_layout::Compositor`] after every structural edit.
//!
//! # Example
//!
//! ```
//! use lexi_doc::Document;
//!
//! let mut doc = Document::default();
//! doc.insert_char('h').unwrap();
//! doc.insert_char('i').unwrap();
//! assert_eq!(doc.text(), "hi");
//! assert_eq!(doc.cursor_offset(), 2);
//! ```

pub mod container;
pub mod document;
pub mod glyph;
pub mod render;
pub mod snapshot;

pub use document::{Document, LayoutState};
pub use glyph::{GlyphKind, GlyphTree};
pub use render::{DrawItem, DrawKind, RenderSink};
pub use snapshot::{CharacterSnapshot, DocumentSnapshot, PageSnapshot, RowSnapshot};

pub use lexi_core::{EditorError, GlyphId, Point, Rect, Result};
