//! Brightness dynamic range
//!
//! The spread between the 5th and 95th percentile of the brightness plane
//! ignores deep shadows and blown highlights, which makes it a stable proxy
//! for contrast and HDR-like scenes.

use crate::constants::dynamic_range::{
    DECIMALS, HIGH_LIMIT, HIGH_PERCENTILE, LOW_LIMIT, LOW_PERCENTILE, MEDIUM_LIMIT,
};
use crate::constants::round_to;
use crate::error::{AnalysisError, Result};
use image::GrayImage;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Contrast class of a brightness range (0-255 scale)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RangeClass {
    /// Below 60: dark or shadowed
    Low,
    /// Below 120
    Medium,
    /// Below 200
    High,
    /// HDR-like
    VeryHigh,
}

impl RangeClass {
    pub fn from_range(range: f64) -> Self {
        if range < LOW_LIMIT {
            RangeClass::Low
        } else if range < MEDIUM_LIMIT {
            RangeClass::Medium
        } else if range < HIGH_LIMIT {
            RangeClass::High
        } else {
            RangeClass::VeryHigh
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RangeClass::Low => "Low dynamic range (dark / shadowed image)",
            RangeClass::Medium => "Medium dynamic range",
            RangeClass::High => "High dynamic range",
            RangeClass::VeryHigh => "Very high dynamic range (HDR-like)",
        }
    }
}

impl fmt::Display for RangeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Percentile brightness bounds and their spread
///
/// `class` is `None` only for the failure default.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DynamicRange {
    pub min: f64,
    pub max: f64,
    pub range: f64,
    pub class: Option<RangeClass>,
}

/// Percentile-based dynamic range estimator
#[derive(Debug, Clone, Copy, Default)]
pub struct DynamicRangeEstimator;

impl DynamicRangeEstimator {
    pub fn new() -> Self {
        Self
    }

    /// Estimate the dynamic range of a raw (0-255) brightness plane
    pub fn estimate(&self, brightness: &GrayImage) -> Result<DynamicRange> {
        let percentiles = BrightnessPercentiles::new(brightness)?;
        let min = percentiles.at(LOW_PERCENTILE);
        let max = percentiles.at(HIGH_PERCENTILE);
        let range = max - min;

        Ok(DynamicRange {
            min: round_to(min, DECIMALS),
            max: round_to(max, DECIMALS),
            range: round_to(range, DECIMALS),
            class: Some(RangeClass::from_range(range)),
        })
    }
}

/// Order statistics of an 8-bit plane via its cumulative histogram
struct BrightnessPercentiles {
    cumulative: [u64; 256],
    count: u64,
}

impl BrightnessPercentiles {
    fn new(plane: &GrayImage) -> Result<Self> {
        let mut histogram = [0u64; 256];
        for pixel in plane.pixels() {
            histogram[pixel.0[0] as usize] += 1;
        }
        let count = plane.width() as u64 * plane.height() as u64;
        if count == 0 {
            return Err(AnalysisError::degenerate("brightness plane is empty"));
        }

        let mut cumulative = [0u64; 256];
        let mut running = 0;
        for (slot, bucket) in cumulative.iter_mut().zip(histogram) {
            running += bucket;
            *slot = running;
        }
        Ok(Self { cumulative, count })
    }

    /// Value of the `k`-th smallest sample (0-based)
    fn kth(&self, k: u64) -> f64 {
        self.cumulative.partition_point(|&c| c <= k) as f64
    }

    /// Linearly interpolated percentile, `p` in [0, 100]
    fn at(&self, p: f64) -> f64 {
        let rank = p / 100.0 * (self.count - 1) as f64;
        let lower = rank.floor();
        let fraction = rank - lower;
        let low = self.kth(lower as u64);
        if fraction == 0.0 {
            return low;
        }
        let high = self.kth(lower as u64 + 1);
        low + (high - low) * fraction
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn test_uniform_plane_has_zero_range() {
        let plane = GrayImage::from_pixel(20, 20, Luma([128]));
        let dr = DynamicRangeEstimator::new().estimate(&plane).unwrap();
        assert_eq!((dr.min, dr.max, dr.range), (128.0, 128.0, 0.0));
        assert_eq!(dr.class, Some(RangeClass::Low));
    }

    #[test]
    fn test_linear_interpolation() {
        // 0..=100 in a single row: percentiles land exactly on samples
        let plane = GrayImage::from_fn(101, 1, |x, _| Luma([x as u8]));
        let dr = DynamicRangeEstimator::new().estimate(&plane).unwrap();
        assert_eq!(dr.min, 5.0);
        assert_eq!(dr.max, 95.0);
        assert_eq!(dr.range, 90.0);
        assert_eq!(dr.class, Some(RangeClass::Medium));

        // two samples: the 5th percentile is 5 % of the way between them
        let pair = GrayImage::from_fn(2, 1, |x, _| Luma([if x == 0 { 0 } else { 200 }]));
        let dr = DynamicRangeEstimator::new().estimate(&pair).unwrap();
        assert_eq!(dr.min, 10.0);
        assert_eq!(dr.max, 190.0);
        assert_eq!(dr.class, Some(RangeClass::High));
    }

    #[test]
    fn test_full_gradient_is_very_high() {
        let plane = GrayImage::from_fn(256, 4, |x, _| Luma([x as u8]));
        let dr = DynamicRangeEstimator::new().estimate(&plane).unwrap();
        assert!(dr.min <= dr.max);
        assert!((dr.range - (dr.max - dr.min)).abs() < 0.11);
        assert_eq!(dr.class, Some(RangeClass::VeryHigh));
    }

    #[test]
    fn test_class_boundaries() {
        assert_eq!(RangeClass::from_range(59.9), RangeClass::Low);
        assert_eq!(RangeClass::from_range(60.0), RangeClass::Medium);
        assert_eq!(RangeClass::from_range(119.9), RangeClass::Medium);
        assert_eq!(RangeClass::from_range(120.0), RangeClass::High);
        assert_eq!(RangeClass::from_range(200.0), RangeClass::VeryHigh);
    }

    #[test]
    fn test_empty_plane_is_degenerate() {
        let result = DynamicRangeEstimator::new().estimate(&GrayImage::new(0, 0));
        assert!(matches!(result, Err(AnalysisError::DegenerateInput { .. })));
    }
}
