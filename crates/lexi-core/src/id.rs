#![forbid(unsafe_code)]

//! Stable handles into the glyph arena.

use std::fmt;

/// Generational index of a glyph node.
///
/// The generation changes every time a slot is reused, so a handle kept
/// past the removal of its glyph never resolves to an unrelated node.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GlyphId {
    index: u32,
    generation: u32,
}

impl GlyphId {
    /// Assemble a handle from its raw parts.
    #[must_use]
    pub const fn from_parts(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Slot index in the arena.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.index
    }

    /// Generation of the slot when the handle was issued.
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for GlyphId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GlyphId({}v{})", self.index, self.generation)
    }
}

impl fmt::Display for GlyphId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

#[cfg(test)]
mod tests {
    use super::GlyphId;

    #[test]
    fn parts_round_trip() {
        let id = GlyphId::from_parts(7, 3);
        assert_eq!(id.index(), 7);
        assert_eq!(id.generation(), 3);
        assert_eq!(id.to_string(), "#7v3");
    }

    #[test]
    fn generation_distinguishes_reused_slots() {
        assert_ne!(GlyphId::from_parts(1, 0), GlyphId::from_parts(1, 1));
    }
}
