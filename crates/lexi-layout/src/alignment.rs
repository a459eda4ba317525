#![forbid(unsafe_code)]

//! Horizontal placement of glyphs within a row.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Row alignment mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// Packed from the row's left edge.
    #[default]
    Left,
    /// Packed run centered in the row; the odd unit of slack goes right.
    Center,
    /// Packed against the row's right border.
    Right,
    /// First glyph at the row start, the rest flush behind it.
    Justified,
}

impl Alignment {
    /// Offset of the packed run from the row start, given the row's slack.
    ///
    /// Negative slack (overflowing content) is treated as zero so the run
    /// never starts left of the row.
    #[must_use]
    pub const fn leading_gap(self, slack: i32) -> i32 {
        let slack = if slack < 0 { 0 } else { slack };
        match self {
            Self::Left | Self::Justified => 0,
            Self::Center => slack / 2,
            Self::Right => slack,
        }
    }
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Left => write!(f, "left"),
            Self::Center => write!(f, "center"),
            Self::Right => write!(f, "right"),
            Self::Justified => write!(f, "justified"),
        }
    }
}

impl FromStr for Alignment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "left" => Ok(Self::Left),
            "center" => Ok(Self::Center),
            "right" => Ok(Self::Right),
            "justified" | "justify" => Ok(Self::Justified),
            other => Err(format!("unknown alignment: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leading_gap_per_mode() {
        assert_eq!(Alignment::Left.leading_gap(425), 0);
        assert_eq!(Alignment::Justified.leading_gap(425), 0);
        assert_eq!(Alignment::Center.leading_gap(425), 212);
        assert_eq!(Alignment::Right.leading_gap(425), 425);
    }

    #[test]
    fn overflow_never_shifts_left() {
        assert_eq!(Alignment::Right.leading_gap(-20), 0);
        assert_eq!(Alignment::Center.leading_gap(-20), 0);
    }

    #[test]
    fn display_and_parse_agree() {
        for mode in [
            Alignment::Left,
            Alignment::Center,
            Alignment::Right,
            Alignment::Justified,
        ] {
            assert_eq!(mode.to_string().parse::<Alignment>(), Ok(mode));
        }
        assert!("diagonal".parse::<Alignment>().is_err());
    }

    #[test]
    fn serde_uses_lowercase_names() {
        let json = serde_json::to_string(&Alignment::Center).unwrap();
        assert_eq!(json, "\"center\"");
    }
}
