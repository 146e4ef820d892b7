//! Decoding and canonicalisation of a source photo
//!
//! [`ImagePreprocessor`] turns a file (or an already decoded image) into a
//! [`PreparedImage`]: the canonical RGB raster, its HSV planes, the mean
//! RGB triple and a brightness plane. The prepared image is immutable and
//! is shared by reference across every statistic so an image is decoded
//! and converted exactly once. Recomputing it from the same file yields
//! bit-identical planes.

use crate::color::ColorConverter;
use crate::config::PreprocessingConfig;
use crate::error::{AnalysisError, Result};
use crate::image_loader;
use image::{ColorType, DynamicImage, GrayImage, ImageBuffer, Luma, RgbImage};
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Single-channel float plane (hue degrees or saturation/value percent)
pub type Plane = ImageBuffer<Luma<f32>, Vec<f32>>;

/// Which raster the brightness plane was taken from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrightnessSource {
    Canonical,
    FullResolution,
}

/// Canonical, read-only representation of one photo
///
/// Invariants: hue ∈ [0, 360), saturation and value ∈ [0, 100], RGB
/// components ∈ [0, 255]; all planes share the canonical dimensions.
#[derive(Debug, Clone)]
pub struct PreparedImage {
    rgb: RgbImage,
    hue: Plane,
    saturation: Plane,
    value: Plane,
    mean_rgb: [f64; 3],
    brightness: GrayImage,
    brightness_source: BrightnessSource,
    source_color: ColorType,
    source_dimensions: (u32, u32),
}

impl PreparedImage {
    /// Build every derived plane from a canonical raster
    ///
    /// `full_brightness` replaces the canonical brightness plane when given.
    fn from_canonical(
        rgb: RgbImage,
        full_brightness: Option<GrayImage>,
        source_color: ColorType,
        source_dimensions: (u32, u32),
    ) -> Self {
        let converter = ColorConverter::new();
        let (width, height) = rgb.dimensions();

        let mut hue = Plane::new(width, height);
        let mut saturation = Plane::new(width, height);
        let mut value = Plane::new(width, height);
        let mut canonical_brightness = GrayImage::new(width, height);
        let mut sums = [0f64; 3];

        for (x, y, pixel) in rgb.enumerate_pixels() {
            let [r, g, b] = pixel.0;
            let [h, s, v] = converter.rgb_to_hsv_bytes(r, g, b);
            hue.put_pixel(x, y, Luma([converter.hue_byte_to_degrees(h)]));
            saturation.put_pixel(x, y, Luma([converter.byte_to_percent(s)]));
            value.put_pixel(x, y, Luma([converter.byte_to_percent(v)]));
            canonical_brightness.put_pixel(x, y, Luma([v]));
            sums[0] += r as f64;
            sums[1] += g as f64;
            sums[2] += b as f64;
        }

        let count = (width as u64 * height as u64).max(1) as f64;
        let mean_rgb = [sums[0] / count, sums[1] / count, sums[2] / count];

        let (brightness, brightness_source) = match full_brightness {
            Some(plane) => (plane, BrightnessSource::FullResolution),
            None => (canonical_brightness, BrightnessSource::Canonical),
        };

        Self {
            rgb,
            hue,
            saturation,
            value,
            mean_rgb,
            brightness,
            brightness_source,
            source_color,
            source_dimensions,
        }
    }

    /// Canonical RGB raster
    pub fn rgb(&self) -> &RgbImage {
        &self.rgb
    }

    /// Hue plane in degrees
    pub fn hue(&self) -> &Plane {
        &self.hue
    }

    /// Saturation plane in percent
    pub fn saturation(&self) -> &Plane {
        &self.saturation
    }

    /// Value plane in percent
    pub fn value(&self) -> &Plane {
        &self.value
    }

    /// Per-channel mean of the canonical raster, 0-255 scale
    pub fn mean_rgb(&self) -> [f64; 3] {
        self.mean_rgb
    }

    /// Raw brightness (HSV value byte, 0-255) used for dynamic range
    pub fn brightness(&self) -> &GrayImage {
        &self.brightness
    }

    pub fn brightness_source(&self) -> BrightnessSource {
        self.brightness_source
    }

    /// Color type of the decoded source before canonicalisation
    pub fn source_color(&self) -> ColorType {
        self.source_color
    }

    pub fn source_dimensions(&self) -> (u32, u32) {
        self.source_dimensions
    }

    /// Canonical (width, height)
    pub fn dimensions(&self) -> (u32, u32) {
        self.rgb.dimensions()
    }

    pub fn pixel_count(&self) -> usize {
        self.rgb.width() as usize * self.rgb.height() as usize
    }
}

/// Produces [`PreparedImage`] values according to a [`PreprocessingConfig`]
#[derive(Debug, Clone, Default)]
pub struct ImagePreprocessor {
    config: PreprocessingConfig,
}

impl ImagePreprocessor {
    pub fn new(config: PreprocessingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PreprocessingConfig {
        &self.config
    }

    /// Decode a file and prepare it
    ///
    /// # Errors
    ///
    /// Returns the loader's `UnsupportedFormat` / `ImageLoadError` when the
    /// file cannot be decoded, `DegenerateInput` for an empty image.
    pub fn prepare(&self, path: &Path) -> Result<PreparedImage> {
        let image = image_loader::load_image(path)?;
        debug!(path = %path.display(), width = image.width(), height = image.height(), "decoded image");
        self.prepare_image(&image)
    }

    /// Prepare an already decoded image
    pub fn prepare_image(&self, image: &DynamicImage) -> Result<PreparedImage> {
        let (width, height) = (self.config.canonical_width, self.config.canonical_height);
        if width == 0 || height == 0 {
            return Err(AnalysisError::invalid_parameter(
                "canonical_size",
                format!("{}x{}", width, height),
            ));
        }
        if image.width() == 0 || image.height() == 0 {
            return Err(AnalysisError::degenerate("image has no pixels"));
        }

        let full = image.to_rgb8();
        let canonical = image::imageops::resize(&full, width, height, self.config.resize_filter.into());

        let full_brightness = self
            .config
            .full_resolution_dynamic_range
            .then(|| brightness_plane(&full));

        Ok(PreparedImage::from_canonical(
            canonical,
            full_brightness,
            image.color(),
            (image.width(), image.height()),
        ))
    }
}

/// HSV value byte (largest channel) of every pixel
pub fn brightness_plane(rgb: &RgbImage) -> GrayImage {
    GrayImage::from_fn(rgb.width(), rgb.height(), |x, y| {
        let [r, g, b] = rgb.get_pixel(x, y).0;
        Luma([r.max(g).max(b)])
    })
}

/// Where a statistic takes its pixels from
///
/// A path is decoded on demand; a prepared image is reused as is.
#[derive(Debug, Clone, Copy)]
pub enum ImageSource<'a> {
    Path(&'a Path),
    Prepared(&'a PreparedImage),
}

impl<'a> ImageSource<'a> {
    /// Obtain a prepared image, decoding only when needed
    pub fn resolve(self, preprocessor: &ImagePreprocessor) -> Result<Cow<'a, PreparedImage>> {
        match self {
            ImageSource::Path(path) => preprocessor.prepare(path).map(Cow::Owned),
            ImageSource::Prepared(prepared) => Ok(Cow::Borrowed(prepared)),
        }
    }
}

impl<'a> From<&'a Path> for ImageSource<'a> {
    fn from(path: &'a Path) -> Self {
        ImageSource::Path(path)
    }
}

impl<'a> From<&'a PathBuf> for ImageSource<'a> {
    fn from(path: &'a PathBuf) -> Self {
        ImageSource::Path(path.as_path())
    }
}

impl<'a> From<&'a PreparedImage> for ImageSource<'a> {
    fn from(prepared: &'a PreparedImage) -> Self {
        ImageSource::Prepared(prepared)
    }
}
