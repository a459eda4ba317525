#![forbid(unsafe_code)]

//! Core: geometry, errors, and index arithmetic shared by every Lexi crate.
//!
//! # Role in Lexi
//! `lexi-core` is the leaf of the dependency graph. It owns the value types
//! the glyph tree is measured in, the error enum returned by every fallible
//! operation, and the wrapping and clamping counters behind the undo ring.
//!
//! # Primary responsibilities
//! - **Point / Rect / Sides**: integer geometry with inclusive-edge hit tests.
//! - **GlyphId**: generational handle into the glyph arena.
//! - **EditorError**: the error taxonomy surfaced to callers.
//! - **CircularValue / LimitedValue**: modulo-wrapping and clamped counters.

pub mod counter;
pub mod error;
pub mod geometry;
pub mod id;

pub use counter::{CircularValue, LimitedValue};
pub use error::{EditorError, HistoryDirection, Result};
pub use geometry::{Point, Rect, Sides};
pub use id::GlyphId;
