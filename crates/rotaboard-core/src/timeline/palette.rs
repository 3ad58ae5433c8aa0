//! Colour tokens for shift blocks, keyed by shift length.

use serde::{Deserialize, Serialize};

use crate::schedule::ShiftLengths;

/// Presentation colour of a block. Rendering maps tokens to real colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorToken {
    Teal,
    Blue,
    Violet,
    Amber,
    Rose,
    Green,
    /// Length is not one of the configured lengths
    Neutral,
}

const PALETTE: [ColorToken; 6] = [
    ColorToken::Teal,
    ColorToken::Blue,
    ColorToken::Violet,
    ColorToken::Amber,
    ColorToken::Rose,
    ColorToken::Green,
];

impl ColorToken {
    /// Suggested hex colour for terminal or web output.
    pub fn hex(&self) -> &'static str {
        match self {
            ColorToken::Teal => "#14b8a6",
            ColorToken::Blue => "#3b82f6",
            ColorToken::Violet => "#8b5cf6",
            ColorToken::Amber => "#f59e0b",
            ColorToken::Rose => "#f43f5e",
            ColorToken::Green => "#22c55e",
            ColorToken::Neutral => "#9ca3af",
        }
    }
}

/// Colour for a shift length, by its rank among the configured lengths.
///
/// The palette wraps when there are more lengths than colours.
pub fn color_for_length(length: f64, all_lengths: &ShiftLengths) -> ColorToken {
    match all_lengths.position(length) {
        Some(idx) => PALETTE[idx % PALETTE.len()],
        None => ColorToken::Neutral,
    }
}
