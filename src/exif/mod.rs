//! EXIF metadata extraction module
//!
//! This module reads the camera, capture time and GPS fields merged into
//! per-image reports. It plays no part in the feature vector.

pub mod extractor;

pub use extractor::{CameraMetadata, ExifExtractor, MetadataNote};
