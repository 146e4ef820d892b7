//! White balance estimation from channel means
//!
//! Uses the gray-world assumption: in a neutral scene the three channel
//! means are equal, so each mean divided by their grand mean measures the
//! color-temperature bias of the photo.

use crate::constants::white_balance::{
    COOL_BLUE_MIN, COOL_RED_MAX, NEUTRAL_TOLERANCE, RATIO_DECIMALS, WARM_GREEN_MAX, WARM_RED_MIN,
};
use crate::constants::round_to;
use crate::error::{AnalysisError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Color-temperature bias of a photo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WhiteBalanceTone {
    /// Reddish cast
    Warm,
    /// Bluish cast
    Cool,
    /// Channels balanced within tolerance
    Neutral,
    /// None of the above
    Mixed,
}

impl WhiteBalanceTone {
    pub fn label(&self) -> &'static str {
        match self {
            WhiteBalanceTone::Warm => "Warm (reddish tone)",
            WhiteBalanceTone::Cool => "Cool (bluish tone)",
            WhiteBalanceTone::Neutral => "Neutral / white balanced",
            WhiteBalanceTone::Mixed => "Mixed / uncertain",
        }
    }
}

impl fmt::Display for WhiteBalanceTone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Channel-to-gray ratios and the tone they classify to
///
/// Ratios are rounded to two decimals; the tone is decided on the
/// unrounded values. `tone` is `None` only for the failure default.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WhiteBalance {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub tone: Option<WhiteBalanceTone>,
}

/// Gray-world white balance estimator
#[derive(Debug, Clone, Copy, Default)]
pub struct WhiteBalanceEstimator;

impl WhiteBalanceEstimator {
    pub fn new() -> Self {
        Self
    }

    /// Estimate the white balance from per-channel means (0-255 scale)
    ///
    /// # Errors
    ///
    /// `DegenerateInput` when the grand mean is zero (all-black image) and
    /// `ComputationError` when a mean is not finite.
    pub fn estimate(&self, mean_rgb: [f64; 3]) -> Result<WhiteBalance> {
        if mean_rgb.iter().any(|m| !m.is_finite()) {
            return Err(AnalysisError::computation(
                "white_balance",
                format!("non-finite channel mean {:?}", mean_rgb),
            ));
        }

        let [r_mean, g_mean, b_mean] = mean_rgb;
        let gray = (r_mean + g_mean + b_mean) / 3.0;
        if gray == 0.0 {
            return Err(AnalysisError::degenerate(
                "channel means are all zero; white balance ratios are undefined",
            ));
        }

        let (r, g, b) = (r_mean / gray, g_mean / gray, b_mean / gray);

        Ok(WhiteBalance {
            red: round_to(r, RATIO_DECIMALS),
            green: round_to(g, RATIO_DECIMALS),
            blue: round_to(b, RATIO_DECIMALS),
            tone: Some(Self::classify(r, g, b)),
        })
    }

    /// Classify unrounded ratios; the first matching rule wins
    pub fn classify(r: f64, g: f64, b: f64) -> WhiteBalanceTone {
        if r > WARM_RED_MIN && g < WARM_GREEN_MAX {
            WhiteBalanceTone::Warm
        } else if b > COOL_BLUE_MIN && r < COOL_RED_MAX {
            WhiteBalanceTone::Cool
        } else if (r - b).abs() < NEUTRAL_TOLERANCE && (r - g).abs() < NEUTRAL_TOLERANCE {
            WhiteBalanceTone::Neutral
        } else {
            WhiteBalanceTone::Mixed
        }
    }
}
