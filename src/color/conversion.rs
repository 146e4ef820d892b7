//! Color space conversion utilities
//!
//! Provides the two RGB→HSV conversions the pipeline relies on:
//! - a float conversion (via `palette`) for single averaged colors
//! - the 8-bit HSV image encoding used for per-pixel planes, with the
//!   exact truncation behaviour classifiers were trained on
//!
//! Hue is reported in degrees [0, 360), saturation and value in percent.

use crate::constants::{self, canonical::CHANNEL_MAX, canonical::HUE_CIRCLE_DEGREES};
use palette::{FromColor, Hsv, Srgb};
use serde::{Deserialize, Serialize};

/// A color in hue (degrees), saturation (%) and value (%)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HsvColor {
    pub hue: f64,
    pub saturation: f64,
    pub value: f64,
}

impl HsvColor {
    pub fn new(hue: f64, saturation: f64, value: f64) -> Self {
        Self {
            hue,
            saturation,
            value,
        }
    }

    /// Round every component to 0.1
    pub fn rounded(self) -> Self {
        let d = constants::color::HSV_DECIMALS;
        Self {
            hue: constants::round_to(self.hue, d),
            saturation: constants::round_to(self.saturation, d),
            value: constants::round_to(self.value, d),
        }
    }
}

/// Stateless RGB→HSV converter
#[derive(Debug, Clone, Copy, Default)]
pub struct ColorConverter;

impl ColorConverter {
    pub fn new() -> Self {
        Self
    }

    /// Convert a float RGB triple on the 0-255 scale to HSV
    ///
    /// Used for averaged colors, so the input does not need to be integral.
    pub fn rgb_to_hsv(&self, r: f64, g: f64, b: f64) -> HsvColor {
        let scale = CHANNEL_MAX as f64;
        let srgb = Srgb::new(r / scale, g / scale, b / scale);
        let hsv: Hsv<palette::encoding::Srgb, f64> = Hsv::from_color(srgb);
        let hue = if hsv.saturation > 0.0 {
            hsv.hue.into_positive_degrees()
        } else {
            0.0
        };
        HsvColor::new(hue, hsv.saturation * 100.0, hsv.value * 100.0)
    }

    /// Encode an 8-bit RGB pixel as 8-bit HSV bytes
    ///
    /// V is the largest channel; S and H are truncated (not rounded) onto
    /// 0-255. Grays get H = S = 0. The encoded hue never reaches 255.
    pub fn rgb_to_hsv_bytes(&self, r: u8, g: u8, b: u8) -> [u8; 3] {
        let maxc = r.max(g).max(b);
        let minc = r.min(g).min(b);
        if maxc == minc {
            return [0, 0, maxc];
        }

        // single-precision intermediates, double-precision scaling
        let cr = (maxc - minc) as f32;
        let s = cr / maxc as f32;
        let rc = ((maxc - r) as f32 / cr) as f64;
        let gc = ((maxc - g) as f32 / cr) as f64;
        let bc = ((maxc - b) as f32 / cr) as f64;

        let sector = (if r == maxc {
            bc - gc
        } else if g == maxc {
            2.0 + rc - bc
        } else {
            4.0 + gc - rc
        }) as f32;
        let h = ((sector as f64 / 6.0 + 1.0) % 1.0) as f32;

        let max = CHANNEL_MAX as f64;
        let uh = (h as f64 * max).clamp(0.0, max) as u8;
        let us = (s as f64 * max).clamp(0.0, max) as u8;
        [uh, us, maxc]
    }

    /// Hue byte to degrees in [0, 360)
    pub fn hue_byte_to_degrees(&self, byte: u8) -> f32 {
        byte as f32 / CHANNEL_MAX * HUE_CIRCLE_DEGREES
    }

    /// Saturation or value byte to percent in [0, 100]
    pub fn byte_to_percent(&self, byte: u8) -> f32 {
        byte as f32 / CHANNEL_MAX * 100.0
    }
}
