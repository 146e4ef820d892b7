//! Structural (edge and line) features
//!
//! This module measures texture and geometry on a grayscale conversion of
//! the canonical raster: the mean Sobel gradient magnitude and the number
//! of straight segments found by Canny edges followed by a probabilistic
//! Hough transform. Line counts depend on resolution; the fixed canonical
//! size keeps them comparable across photos.

pub mod edges;
pub mod lines;

pub use edges::{canny_edges, edge_density};
pub use lines::{LineSegment, ProbabilisticHough};

use crate::config::{PipelineConfig, StructuralConfig};
use crate::error::Result;
use crate::measurement::Measurement;
use crate::preprocessing::{ImagePreprocessor, ImageSource, PreparedImage};
use image::GrayImage;
use tracing::debug;

/// Edge density and line count over prepared images
#[derive(Debug, Clone)]
pub struct StructuralFeatures {
    preprocessor: ImagePreprocessor,
    config: StructuralConfig,
    hough: ProbabilisticHough,
}

impl Default for StructuralFeatures {
    fn default() -> Self {
        Self::new(ImagePreprocessor::default(), StructuralConfig::default())
    }
}

impl StructuralFeatures {
    pub fn new(preprocessor: ImagePreprocessor, config: StructuralConfig) -> Self {
        let hough = ProbabilisticHough::from_config(&config);
        Self {
            preprocessor,
            config,
            hough,
        }
    }

    pub fn from_pipeline(config: &PipelineConfig) -> Self {
        Self::new(
            ImagePreprocessor::new(config.preprocessing.clone()),
            config.structural.clone(),
        )
    }

    /// Mean gradient magnitude in [0, 1]; 0.0 on failure
    pub fn edge_density<'a>(&self, source: impl Into<ImageSource<'a>>) -> Measurement<f64> {
        let result = source
            .into()
            .resolve(&self.preprocessor)
            .and_then(|prepared| edge_density(&grayscale(&prepared)));
        Measurement::from_result("edge_density", result, || 0.0)
    }

    /// Number of detected line segments; 0 on failure
    pub fn line_count<'a>(&self, source: impl Into<ImageSource<'a>>) -> Measurement<u32> {
        let result = source
            .into()
            .resolve(&self.preprocessor)
            .and_then(|prepared| self.detect_lines(&prepared))
            .map(|segments| segments.len() as u32);
        Measurement::from_result("line_count", result, || 0)
    }

    /// Segments found on the canonical raster
    pub fn detect_lines(&self, prepared: &PreparedImage) -> Result<Vec<LineSegment>> {
        let edges = canny_edges(
            &grayscale(prepared),
            self.config.canny_sigma,
            self.config.canny_low_threshold,
            self.config.canny_high_threshold,
        )?;
        let segments = self.hough.detect(&edges);
        debug!(segments = segments.len(), "line detection finished");
        Ok(segments)
    }
}

/// Luma of the canonical raster
pub fn grayscale(prepared: &PreparedImage) -> GrayImage {
    image::imageops::grayscale(prepared.rgb())
}
