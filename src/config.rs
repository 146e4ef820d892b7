//! Configuration structures for the feature extraction pipeline.
//!
//! This module defines the tunable parameters of feature extraction,
//! organized into groups for preprocessing, color statistics, spatial
//! distribution and structural features.
//!
//! # Configuration Loading
//!
//! Configuration can be loaded from JSON files or constructed programmatically:
//!
//! ```no_run
//! use scene_features::PipelineConfig;
//! use std::path::Path;
//!
//! // Load from file
//! let config = PipelineConfig::from_json_file(Path::new("config.json"))?;
//!
//! // Or use defaults
//! let config = PipelineConfig::default();
//! # Ok::<(), scene_features::AnalysisError>(())
//! ```
//!
//! Thresholds that define the meaning of a feature (percentiles, hue
//! tables, white-balance limits) are not part of the configuration; see
//! [`crate::constants`].

use crate::color::ColorName;
use crate::constants;
use crate::error::{AnalysisError, Result};
use image::imageops::FilterType;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Complete pipeline configuration for feature extraction.
///
/// Two pipelines built from equal configurations produce identical
/// feature vectors for the same file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PipelineConfig {
    /// Decoding and canonical raster parameters
    #[serde(default)]
    pub preprocessing: PreprocessingConfig,

    /// Color statistics parameters
    #[serde(default)]
    pub color: ColorConfig,

    /// Spatial distribution parameters
    #[serde(default)]
    pub spatial: SpatialConfig,

    /// Edge and line detection parameters
    #[serde(default)]
    pub structural: StructuralConfig,
}

/// Preprocessing parameters applied once per image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreprocessingConfig {
    /// Canonical raster width in pixels
    pub canonical_width: u32,

    /// Canonical raster height in pixels
    pub canonical_height: u32,

    /// Resampling filter used to reach the canonical size
    #[serde(default)]
    pub resize_filter: ResizeFilter,

    /// Estimate dynamic range on the full-resolution brightness plane
    /// instead of the canonical one (slower, more faithful)
    #[serde(default)]
    pub full_resolution_dynamic_range: bool,
}

/// Deterministic resampling filters offered for the canonical resize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ResizeFilter {
    Nearest,
    Triangle,
    /// Bicubic
    #[default]
    CatmullRom,
    Gaussian,
    Lanczos3,
}

impl From<ResizeFilter> for FilterType {
    fn from(filter: ResizeFilter) -> Self {
        match filter {
            ResizeFilter::Nearest => FilterType::Nearest,
            ResizeFilter::Triangle => FilterType::Triangle,
            ResizeFilter::CatmullRom => FilterType::CatmullRom,
            ResizeFilter::Gaussian => FilterType::Gaussian,
            ResizeFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

/// Color statistics parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorConfig {
    /// Hue histogram bin width in degrees (histogram-mode dominant hue)
    pub hue_bin_width: f32,

    /// Number of named dominant colors reported
    pub top_colors: usize,
}

/// Spatial distribution parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpatialConfig {
    /// Saturation percent at or below which a pixel counts as gray
    pub gray_saturation_threshold: f32,
}

/// Edge and line detection parameters.
///
/// Line counts are resolution dependent; these defaults are tuned for the
/// 150x150 canonical raster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuralConfig {
    /// Gaussian sigma of the Canny detector
    pub canny_sigma: f32,

    /// Low hysteresis threshold as a fraction of full scale
    pub canny_low_threshold: f32,

    /// High hysteresis threshold as a fraction of full scale
    pub canny_high_threshold: f32,

    /// Accumulator votes needed before a line is traced
    pub hough_threshold: u32,

    /// Minimum accepted segment length in pixels
    pub min_line_length: u32,

    /// Maximum gap bridged inside one segment in pixels
    pub max_line_gap: u32,

    /// Seed of the point visiting order (keeps line counts reproducible)
    pub line_seed: u64,
}

impl Default for PreprocessingConfig {
    fn default() -> Self {
        Self {
            canonical_width: constants::canonical::WIDTH,
            canonical_height: constants::canonical::HEIGHT,
            resize_filter: ResizeFilter::default(),
            full_resolution_dynamic_range: false,
        }
    }
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            hue_bin_width: constants::color::DEFAULT_HUE_BIN_WIDTH,
            top_colors: constants::color::DEFAULT_TOP_COLORS,
        }
    }
}

impl Default for SpatialConfig {
    fn default() -> Self {
        Self {
            gray_saturation_threshold: constants::spatial::DEFAULT_GRAY_SATURATION,
        }
    }
}

impl Default for StructuralConfig {
    fn default() -> Self {
        use constants::structural::*;
        Self {
            canny_sigma: DEFAULT_CANNY_SIGMA,
            canny_low_threshold: DEFAULT_CANNY_LOW,
            canny_high_threshold: DEFAULT_CANNY_HIGH,
            hough_threshold: DEFAULT_HOUGH_THRESHOLD,
            min_line_length: DEFAULT_MIN_LINE_LENGTH,
            max_line_gap: DEFAULT_MAX_LINE_GAP,
            line_seed: DEFAULT_LINE_SEED,
        }
    }
}

impl PipelineConfig {
    /// Check every parameter for a usable value
    pub fn validate(&self) -> Result<()> {
        let pre = &self.preprocessing;
        if pre.canonical_width == 0 {
            return Err(AnalysisError::invalid_parameter("canonical_width", pre.canonical_width));
        }
        if pre.canonical_height == 0 {
            return Err(AnalysisError::invalid_parameter("canonical_height", pre.canonical_height));
        }

        let bin = self.color.hue_bin_width;
        let bins = constants::color::MIN_HUE_BIN_WIDTH..=constants::canonical::HUE_CIRCLE_DEGREES;
        if !bins.contains(&bin) {
            return Err(AnalysisError::invalid_parameter("hue_bin_width", bin));
        }
        let top = self.color.top_colors;
        if top == 0 || top > ColorName::ALL.len() {
            return Err(AnalysisError::invalid_parameter("top_colors", top));
        }

        let gray = self.spatial.gray_saturation_threshold;
        if !(0.0..=100.0).contains(&gray) {
            return Err(AnalysisError::invalid_parameter("gray_saturation_threshold", gray));
        }

        let s = &self.structural;
        if !(s.canny_sigma > 0.0) {
            return Err(AnalysisError::invalid_parameter("canny_sigma", s.canny_sigma));
        }
        if !(0.0..=1.0).contains(&s.canny_low_threshold) {
            return Err(AnalysisError::invalid_parameter(
                "canny_low_threshold",
                s.canny_low_threshold,
            ));
        }
        if !(s.canny_low_threshold..=1.0).contains(&s.canny_high_threshold) {
            return Err(AnalysisError::invalid_parameter(
                "canny_high_threshold",
                s.canny_high_threshold,
            ));
        }
        if s.hough_threshold == 0 {
            return Err(AnalysisError::invalid_parameter("hough_threshold", s.hough_threshold));
        }

        Ok(())
    }

    /// Load configuration from JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            AnalysisError::config(format!("Failed to read {}", path.display()), e)
        })?;
        let config: Self = serde_json::from_str(&content).map_err(|e| {
            AnalysisError::config(format!("Failed to parse {}", path.display()), e)
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to JSON file
    pub fn to_json_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| AnalysisError::config("Failed to serialize configuration", e))?;
        std::fs::write(path, json).map_err(|e| {
            AnalysisError::config(format!("Failed to write {}", path.display()), e)
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = PipelineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.preprocessing.canonical_width, 150);
        assert_eq!(config.preprocessing.canonical_height, 150);
        assert_eq!(config.color.hue_bin_width, 10.0);
        assert_eq!(config.color.top_colors, 3);
        assert!(!config.preprocessing.full_resolution_dynamic_range);
        assert_eq!(config.spatial.gray_saturation_threshold, 40.0);
    }

    #[test]
    fn test_invalid_bin_width_rejected() {
        let mut config = PipelineConfig::default();
        config.color.hue_bin_width = 0.0;
        assert!(config.validate().is_err());
        config.color.hue_bin_width = 400.0;
        assert!(config.validate().is_err());
        config.color.hue_bin_width = f32::NAN;
        assert!(config.validate().is_err());
        config.color.hue_bin_width = 1e-7;
        assert!(config.validate().is_err());
        config.color.hue_bin_width = constants::color::MIN_HUE_BIN_WIDTH;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_top_colors_bounded_by_categories() {
        let mut config = PipelineConfig::default();
        config.color.top_colors = ColorName::ALL.len();
        assert!(config.validate().is_ok());
        config.color.top_colors = ColorName::ALL.len() + 1;
        assert!(config.validate().is_err());
        config.color.top_colors = usize::MAX;
        assert!(matches!(
            config.validate(),
            Err(AnalysisError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_invalid_canonical_size_rejected() {
        let mut config = PipelineConfig::default();
        config.preprocessing.canonical_height = 0;
        assert!(matches!(
            config.validate(),
            Err(AnalysisError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_canny_thresholds_ordered() {
        let mut config = PipelineConfig::default();
        config.structural.canny_high_threshold = 0.05;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_json_roundtrip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = PipelineConfig::default();
        config.preprocessing.full_resolution_dynamic_range = true;
        config.color.top_colors = 5;
        config.to_json_file(&path).unwrap();

        let loaded = PipelineConfig::from_json_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{ "color": { "hue_bin_width": 15.0, "top_colors": 2 } }"#;
        let config: PipelineConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.color.hue_bin_width, 15.0);
        assert_eq!(config.preprocessing, PreprocessingConfig::default());
        assert_eq!(config.structural, StructuralConfig::default());
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let result = PipelineConfig::from_json_file(Path::new("does/not/exist.json"));
        assert!(matches!(result, Err(AnalysisError::ConfigError { .. })));
    }
}
