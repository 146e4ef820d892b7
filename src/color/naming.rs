//! Named color categories over the hue circle
//!
//! Every hue maps to exactly one [`ColorName`] through a fixed table of
//! half-open intervals that partition [0, 360).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Semantic hue category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColorName {
    Red,
    Orange,
    Yellow,
    Green,
    Cyan,
    Blue,
    Purple,
    Pink,
    /// Only reachable for non-finite hues
    Unknown,
}

/// Hue ranges as half-open intervals `[low, high)` in degrees.
///
/// Red wraps around 0° and therefore appears twice.
pub const COLOR_NAME_TABLE: [(f32, f32, ColorName); 9] = [
    (0.0, 15.0, ColorName::Red),
    (15.0, 45.0, ColorName::Orange),
    (45.0, 75.0, ColorName::Yellow),
    (75.0, 150.0, ColorName::Green),
    (150.0, 210.0, ColorName::Cyan),
    (210.0, 270.0, ColorName::Blue),
    (270.0, 310.0, ColorName::Purple),
    (310.0, 345.0, ColorName::Pink),
    (345.0, 360.0, ColorName::Red),
];

impl ColorName {
    /// All categories, in ranking-independent declaration order
    pub const ALL: [ColorName; 9] = [
        ColorName::Red,
        ColorName::Orange,
        ColorName::Yellow,
        ColorName::Green,
        ColorName::Cyan,
        ColorName::Blue,
        ColorName::Purple,
        ColorName::Pink,
        ColorName::Unknown,
    ];

    /// Look up the category of a hue in degrees
    ///
    /// Hues outside [0, 360) are wrapped onto the circle first.
    pub fn from_hue(hue: f32) -> ColorName {
        if !hue.is_finite() {
            return ColorName::Unknown;
        }
        let hue = hue.rem_euclid(360.0);
        COLOR_NAME_TABLE
            .iter()
            .find(|(low, high, _)| hue >= *low && hue < *high)
            .map(|(_, _, name)| *name)
            .unwrap_or(ColorName::Unknown)
    }

    /// Display name used in reports
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorName::Red => "Red",
            ColorName::Orange => "Orange",
            ColorName::Yellow => "Yellow",
            ColorName::Green => "Green",
            ColorName::Cyan => "Cyan",
            ColorName::Blue => "Blue",
            ColorName::Purple => "Purple",
            ColorName::Pink => "Pink",
            ColorName::Unknown => "Unknown",
        }
    }

    pub(crate) fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for ColorName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
