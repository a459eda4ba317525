#![forbid(unsafe_code)]

//! Layout primitives and the page flow solver.
//!
//! The [`Compositor`] turns an ordered run of glyph sizes into rows, columns,
//! and pages. It never touches the glyph tree: the document applies the
//! returned [`Flow`] to its own nodes.

pub mod alignment;
pub mod compositor;

pub use alignment::Alignment;
pub use compositor::{Compositor, CompositorConfig, Flow, PageFlow, RowFlow, Size};
pub use lexi_core::geometry::{Point, Rect, Sides};
