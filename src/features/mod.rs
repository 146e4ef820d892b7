//! Feature vector assembly, schema and reporting
//!
//! This module merges the color, spatial and structural statistics of one
//! image into a fixed-shape [`FeatureVector`], feeds it to an optional
//! [`SceneClassifier`] and builds the human-readable [`ImageReport`].

pub mod assembler;
pub mod classifier;
pub mod report;
pub mod schema;
pub mod vector;

pub use assembler::{hue_buckets, Diagnostic, FeatureAssembler, FeatureExtraction, ImageAnalysis};
pub use classifier::{align_features, categorize, SceneCategory, SceneClassifier};
pub use report::{top_colors_summary, ImageReport, ReportBuilder, RowBands};
pub use schema::{feature_keys, FEATURE_COUNT, FEATURE_SCHEMA_VERSION};
pub use vector::{FeatureValue, FeatureVector};
