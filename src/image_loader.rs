//! Unified image loading for the raster formats handled by the `image` crate
//!
//! This module provides a single entry point for decoding a source photo
//! into a [`DynamicImage`], keeping the native color type so callers can
//! still inspect the original encoding (see the color depth heuristic).
//!
//! ## Supported Formats
//!
//! - JPEG, PNG, GIF (first frame), WebP, TIFF, BMP, ICO, TGA, PNM, QOI
//!
//! ## Design
//!
//! The file extension decides whether a file is considered at all; the
//! decoder itself is chosen by sniffing the content, falling back to the
//! extension when the signature is unknown. EXIF orientation is NOT
//! applied: feature values are defined on the stored pixel grid.

use crate::error::{AnalysisError, Result};
use image::{DynamicImage, ImageReader};
use std::path::Path;

/// Supported image formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// JPEG image
    Jpeg,
    /// PNG image
    Png,
    /// GIF image (first frame only)
    Gif,
    /// WebP image
    WebP,
    /// TIFF image
    Tiff,
    /// BMP image
    Bmp,
    /// ICO image
    Ico,
    /// TGA image
    Tga,
    /// PNM image (PBM, PGM, PPM)
    Pnm,
    /// QOI image
    Qoi,
}

impl ImageFormat {
    /// Detect format from file extension
    pub fn from_extension(path: &Path) -> Option<ImageFormat> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "png" => Some(ImageFormat::Png),
            "gif" => Some(ImageFormat::Gif),
            "webp" => Some(ImageFormat::WebP),
            "tiff" | "tif" => Some(ImageFormat::Tiff),
            "bmp" => Some(ImageFormat::Bmp),
            "ico" => Some(ImageFormat::Ico),
            "tga" => Some(ImageFormat::Tga),
            "pbm" | "pgm" | "ppm" | "pnm" => Some(ImageFormat::Pnm),
            "qoi" => Some(ImageFormat::Qoi),
            _ => None,
        }
    }

    /// Whether files of this format may carry EXIF camera metadata we read
    pub fn carries_exif(&self) -> bool {
        matches!(self, ImageFormat::Jpeg)
    }
}

/// Load and decode an image from disk
///
/// # Arguments
///
/// * `path` - Path to the image file
///
/// # Returns
///
/// The decoded image in its native color type
///
/// # Errors
///
/// Returns `AnalysisError::UnsupportedFormat` for unknown extensions and
/// `AnalysisError::ImageLoadError` if the file cannot be opened or decoded.
///
/// # Example
///
/// ```rust,no_run
/// use scene_features::image_loader::load_image;
/// use std::path::Path;
///
/// let image = load_image(Path::new("photo.jpg"))?;
/// println!("Loaded image: {}x{}", image.width(), image.height());
/// # Ok::<(), scene_features::AnalysisError>(())
/// ```
pub fn load_image(path: &Path) -> Result<DynamicImage> {
    if ImageFormat::from_extension(path).is_none() {
        return Err(AnalysisError::UnsupportedFormat {
            path: path.display().to_string(),
        });
    }

    let reader = ImageReader::open(path).map_err(|e| {
        AnalysisError::image_load(format!("Failed to open image file: {}", path.display()), e)
    })?;

    let reader = reader.with_guessed_format().map_err(|e| {
        AnalysisError::image_load(format!("Failed to read image file: {}", path.display()), e)
    })?;

    reader.decode().map_err(|e| {
        AnalysisError::image_load(format!("Failed to decode image: {}", path.display()), e)
    })
}
