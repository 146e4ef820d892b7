//! # Scene Features
//!
//! A Rust crate for turning photographs into deterministic, fixed-shape
//! feature vectors for scene classification.
//!
//! This library extracts, from one canonical 150x150 raster per image:
//! - Global color statistics (average and dominant HSV, named dominant
//!   colors, white balance bias, dynamic range, color depth)
//! - Per-tile green/blue/warm/gray ratios over a 3x3 grid
//! - Structural features (edge density and a straight-line count)
//!
//! Every statistic is fail-soft: a failure yields a documented default plus
//! a diagnostic, and the assembled vector always carries the full key set.
//!
//! ## Example
//!
//! ```rust,no_run
//! use scene_features::extract_features;
//! use std::path::Path;
//!
//! let extraction = extract_features(Path::new("photo.jpg"));
//! println!("avg_hue = {:?}", extraction.features.get_f64("avg_hue"));
//! for diagnostic in &extraction.diagnostics {
//!     eprintln!("{}: {}", diagnostic.component, diagnostic.message);
//! }
//! ```

use std::path::Path;

pub mod batch;
pub mod calibration;
pub mod color;
pub mod config;
pub mod constants;
pub mod detection;
pub mod error;
pub mod exif;
pub mod features;
pub mod image_loader;
pub mod measurement;
pub mod preprocessing;
pub mod spatial;

pub use calibration::{DynamicRange, RangeClass, WhiteBalance, WhiteBalanceTone};
pub use color::{ColorName, ColorStatistics, DominantColor, HsvColor};
pub use config::PipelineConfig;
pub use detection::StructuralFeatures;
pub use error::{AnalysisError, FailureKind, Result};
pub use features::{
    categorize, Diagnostic, FeatureAssembler, FeatureExtraction, FeatureValue, FeatureVector,
    ImageReport, ReportBuilder, SceneCategory, SceneClassifier,
};
pub use measurement::Measurement;
pub use preprocessing::{ImagePreprocessor, ImageSource, PreparedImage};
pub use spatial::{SpatialDistribution, TileDistribution};

/// Extract the feature vector of an image file with the default configuration
///
/// This is the main entry point. It never fails: an unreadable image yields
/// the schema defaults, and every fallback is listed in
/// [`FeatureExtraction::diagnostics`].
pub fn extract_features(image_path: &Path) -> FeatureExtraction {
    FeatureAssembler::default().extract(image_path)
}
