//! Fixed tables and thresholds for feature extraction
//!
//! These values are part of the numeric contract with classifiers trained
//! offline on the feature vector. They are deliberately not configurable:
//! changing any of them changes the meaning of the features.

/// Canonical raster used for every statistic except full-resolution dynamic range
pub mod canonical {
    /// Default canonical width in pixels
    pub const WIDTH: u32 = 150;

    /// Default canonical height in pixels
    pub const HEIGHT: u32 = 150;

    /// Full hue circle in degrees
    pub const HUE_CIRCLE_DEGREES: f32 = 360.0;

    /// Maximum encoded value of an 8-bit channel
    pub const CHANNEL_MAX: f32 = 255.0;
}

/// Color statistics parameters
pub mod color {
    /// Default hue histogram bin width in degrees
    pub const DEFAULT_HUE_BIN_WIDTH: f32 = 10.0;

    /// Default number of named dominant colors reported
    pub const DEFAULT_TOP_COLORS: usize = 3;

    /// Decimal places kept for HSV statistics (0.1° / 0.1 %)
    pub const HSV_DECIMALS: u32 = 1;

    /// Decimal places kept for named-color percentages
    pub const PERCENT_DECIMALS: u32 = 1;

    /// Narrowest accepted hue histogram bin in degrees
    pub const MIN_HUE_BIN_WIDTH: f32 = 0.1;
}

/// White balance classification thresholds on channel-to-gray ratios
pub mod white_balance {
    /// Red ratio above which an image may be warm
    pub const WARM_RED_MIN: f64 = 1.05;

    /// Green ratio below which a red-heavy image is warm
    pub const WARM_GREEN_MAX: f64 = 1.0;

    /// Blue ratio above which an image may be cool
    pub const COOL_BLUE_MIN: f64 = 1.05;

    /// Red ratio below which a blue-heavy image is cool
    pub const COOL_RED_MAX: f64 = 1.0;

    /// Maximum |r-b| and |r-g| for a neutral balance
    pub const NEUTRAL_TOLERANCE: f64 = 0.05;

    /// Decimal places kept for the ratios
    pub const RATIO_DECIMALS: u32 = 2;
}

/// Dynamic range estimation on the 0-255 brightness plane
pub mod dynamic_range {
    /// Lower brightness percentile (shadows below are ignored)
    pub const LOW_PERCENTILE: f64 = 5.0;

    /// Upper brightness percentile (highlights above are ignored)
    pub const HIGH_PERCENTILE: f64 = 95.0;

    /// Ranges below this are low (dark / shadowed)
    pub const LOW_LIMIT: f64 = 60.0;

    /// Ranges below this are medium
    pub const MEDIUM_LIMIT: f64 = 120.0;

    /// Ranges below this are high; anything above is HDR-like
    pub const HIGH_LIMIT: f64 = 200.0;

    /// Decimal places kept for min, max and range
    pub const DECIMALS: u32 = 1;
}

/// Color depth heuristic
pub mod depth {
    /// Reported for ordinary 8-bit RGB / gray encodings
    pub const STANDARD_BITS: u8 = 8;

    /// Reported for 4-channel or wide-channel encodings
    pub const WIDE_BITS: u8 = 16;
}

/// Spatial distribution over the 3x3 grid
pub mod spatial {
    /// Number of tile rows and columns
    pub const GRID_SIZE: u32 = 3;

    /// Green-ish hue range, both ends inclusive
    pub const GREEN_HUE: (f32, f32) = (60.0, 150.0);

    /// Blue-ish hue range, both ends inclusive
    pub const BLUE_HUE: (f32, f32) = (180.0, 260.0);

    /// Warm hue: [0, 60] inclusive ...
    pub const WARM_LOW_HUE: (f32, f32) = (0.0, 60.0);

    /// ... or [300, 360)
    pub const WARM_HIGH_HUE: (f32, f32) = (300.0, 360.0);

    /// Default saturation percent at or below which a pixel counts as gray
    pub const DEFAULT_GRAY_SATURATION: f32 = 40.0;
}

/// Coarse 4-bucket hue histogram used by the classifier
pub mod hue_buckets {
    /// Bucket edges: warm, green, blue, other (last bucket closed)
    pub const EDGES: [f32; 5] = [0.0, 60.0, 150.0, 260.0, 360.0];
}

/// Structural (edge / line) feature parameters
pub mod structural {
    /// Default Gaussian sigma of the Canny detector
    pub const DEFAULT_CANNY_SIGMA: f32 = 2.0;

    /// Default low hysteresis threshold as a fraction of full scale
    pub const DEFAULT_CANNY_LOW: f32 = 0.1;

    /// Default high hysteresis threshold as a fraction of full scale
    pub const DEFAULT_CANNY_HIGH: f32 = 0.2;

    /// Sigma of the smoothing applied inside `imageproc::edges::canny`
    pub const IMAGEPROC_CANNY_SIGMA: f32 = 1.4;

    /// Default accumulator vote threshold of the line detector
    pub const DEFAULT_HOUGH_THRESHOLD: u32 = 10;

    /// Default minimum accepted segment length in pixels
    pub const DEFAULT_MIN_LINE_LENGTH: u32 = 15;

    /// Default maximum gap bridged inside one segment in pixels
    pub const DEFAULT_MAX_LINE_GAP: u32 = 3;

    /// Default seed for the line detector's point visiting order
    pub const DEFAULT_LINE_SEED: u64 = 0x5EED;

    /// Number of quantized angles over [-90°, 90°)
    pub const HOUGH_ANGLES: usize = 180;

    /// Fixed-point shift used while walking along a candidate line
    pub const WALK_SHIFT: u32 = 16;

    /// Sobel kernel normalisation (sum of the smoothing taps)
    pub const SOBEL_NORMALISATION: f64 = 4.0;
}

/// Scene classifier decision
pub mod classifier {
    /// Below this maximum class probability the scene is reported unknown
    pub const UNKNOWN_PROBABILITY_THRESHOLD: f64 = 0.35;
}

/// Round to a fixed number of decimal places
///
/// Rounds the exact binary value through decimal formatting, so a value
/// exactly halfway between two results goes to the even one.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    format!("{:.*}", decimals as usize, value)
        .parse()
        .unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dynamic_range_limits_ordered() {
        assert!(dynamic_range::LOW_PERCENTILE < dynamic_range::HIGH_PERCENTILE);
        assert!(dynamic_range::LOW_LIMIT < dynamic_range::MEDIUM_LIMIT);
        assert!(dynamic_range::MEDIUM_LIMIT < dynamic_range::HIGH_LIMIT);
    }

    #[test]
    fn test_hue_bucket_edges_cover_circle() {
        assert_eq!(hue_buckets::EDGES[0], 0.0);
        assert_eq!(hue_buckets::EDGES[4], canonical::HUE_CIRCLE_DEGREES);
        assert!(hue_buckets::EDGES.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_effective_canny_sigma_reachable() {
        assert!(structural::DEFAULT_CANNY_SIGMA > structural::IMAGEPROC_CANNY_SIGMA);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(3.14159, 1), 3.1);
        assert_eq!(round_to(2.675_1, 2), 2.68);
        assert_eq!(round_to(0.04, 1), 0.0);
        assert_eq!(round_to(f64::INFINITY, 1), f64::INFINITY);
    }

    #[test]
    fn test_round_to_exact_ties_go_to_even() {
        assert_eq!(round_to(1.125, 2), 1.12);
        assert_eq!(round_to(0.9375, 2), 0.94);
        assert_eq!(round_to(0.25, 1), 0.2);
        assert_eq!(round_to(0.75, 1), 0.8);
        assert_eq!(round_to(2.5, 0), 2.0);
    }

    #[test]
    fn test_round_to_uses_stored_value() {
        // these literals are stored just below the decimal tie
        assert_eq!(round_to(2.675, 2), 2.67);
        assert_eq!(round_to(0.35, 1), 0.3);
        assert_eq!(round_to(12.95, 1), 12.9);
    }
}
