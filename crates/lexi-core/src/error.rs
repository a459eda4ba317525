#![forbid(unsafe_code)]

//! Error taxonomy for editor operations.
//!
//! Every user-reachable failure is a value of [`EditorError`]. Undo/redo on
//! an empty history is reported as [`EditorError::HistoryEmpty`] and leaves
//! all state untouched.

use thiserror::Error;

use crate::id::GlyphId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditorError {
    /// Negative width, height, or position, or a move that would produce one.
    #[error("invalid geometry: ({x}, {y}) {width}x{height}")]
    InvalidGeometry {
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    },
    /// Insert coordinates do not line up with any sibling in the row.
    #[error("no suitable position in row {row} for glyph at x={x}")]
    NoSuitablePosition { row: GlyphId, x: i32 },
    /// No row in the column intersects the incoming glyph.
    #[error("no suitable row in column {column} for glyph at ({x}, {y})")]
    NoSuitableRow { column: GlyphId, x: i32, y: i32 },
    /// Remove or index lookup on a glyph that is not there.
    #[error("glyph {0} not found")]
    GlyphNotFound(GlyphId),
    /// The operation was given no target.
    #[error("operation has no target glyph")]
    NullGlyph,
    /// Undo or redo with nothing available.
    #[error("nothing to {0}")]
    HistoryEmpty(HistoryDirection),
    /// The glyph is already attached to a container.
    #[error("glyph {0} is already attached to the tree")]
    AlreadyAttached(GlyphId),
    /// The container cannot hold a glyph of this kind.
    #[error("{parent} cannot hold a {child}")]
    UnsupportedChild {
        parent: &'static str,
        child: &'static str,
    },
    /// The glyph is structurally required (first page, first row).
    #[error("glyph {0} cannot be removed")]
    Pinned(GlyphId),
    /// The persistence hook failed.
    #[error("storage: {0}")]
    Storage(String),
}

/// Which history operation found nothing to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryDirection {
    Undo,
    Redo,
}

impl std::fmt::Display for HistoryDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Undo => f.write_str("undo"),
            Self::Redo => f.write_str("redo"),
        }
    }
}

impl EditorError {
    /// True for the recoverable "nothing to undo/redo" report.
    #[must_use]
    pub const fn is_history_empty(&self) -> bool {
        matches!(self, Self::HistoryEmpty(_))
    }
}

pub type Result<T> = std::result::Result<T, EditorError>;
