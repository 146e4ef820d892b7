//! Whole-image color statistics
//!
//! [`ColorStatistics`] exposes independent operations over a photo:
//! - average HSV of the mean color
//! - histogram-mode dominant HSV
//! - ranking of named color categories
//! - white balance ratios and dynamic range (see [`crate::calibration`])
//! - a coarse color depth heuristic
//!
//! Every operation accepts either a path or a [`PreparedImage`] and fails
//! soft: it returns a [`Measurement`] carrying the documented default and
//! the error instead of propagating it.

use crate::calibration::{DynamicRange, DynamicRangeEstimator, WhiteBalance, WhiteBalanceEstimator};
use crate::color::{ColorConverter, ColorName, HsvColor, HueHistogram};
use crate::config::{ColorConfig, PipelineConfig};
use crate::constants::{self, depth};
use crate::error::{AnalysisError, Result};
use crate::measurement::Measurement;
use crate::preprocessing::{ImagePreprocessor, ImageSource, PreparedImage};
use image::ColorType;
use serde::Serialize;
use tracing::debug;

/// One entry of the named-color ranking
///
/// A padding slot (fewer categories present than requested) has no name
/// and zero percentage and hue.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct DominantColor {
    pub name: Option<ColorName>,
    /// Share of all pixels, percent rounded to 0.1
    pub percentage: f64,
    /// Mean hue of the category's pixels, rounded to 0.1°
    pub mean_hue: f64,
}

impl DominantColor {
    /// Category name, or an empty string for padding
    pub fn label(&self) -> &'static str {
        self.name.map(|n| n.as_str()).unwrap_or("")
    }
}

/// Color statistics over prepared images
#[derive(Debug, Clone, Default)]
pub struct ColorStatistics {
    preprocessor: ImagePreprocessor,
    config: ColorConfig,
    converter: ColorConverter,
    white_balance: WhiteBalanceEstimator,
    dynamic_range: DynamicRangeEstimator,
}

impl ColorStatistics {
    /// `preprocessor` is only used when an operation is handed a path
    pub fn new(preprocessor: ImagePreprocessor, config: ColorConfig) -> Self {
        Self {
            preprocessor,
            config,
            converter: ColorConverter::new(),
            white_balance: WhiteBalanceEstimator::new(),
            dynamic_range: DynamicRangeEstimator::new(),
        }
    }

    pub fn from_pipeline(config: &PipelineConfig) -> Self {
        Self::new(
            ImagePreprocessor::new(config.preprocessing.clone()),
            config.color.clone(),
        )
    }

    pub fn config(&self) -> &ColorConfig {
        &self.config
    }

    /// HSV of the mean RGB color; (0, 0, 0) on failure
    pub fn average_hsv<'a>(&self, source: impl Into<ImageSource<'a>>) -> Measurement<HsvColor> {
        let result = source
            .into()
            .resolve(&self.preprocessor)
            .and_then(|prepared| self.compute_average_hsv(&prepared));
        Measurement::from_result("average_hsv", result, HsvColor::default)
    }

    /// Mean HSV of the most populous hue bin; (0, 0, 0) on failure
    pub fn dominant_hsv<'a>(&self, source: impl Into<ImageSource<'a>>) -> Measurement<HsvColor> {
        let result = source
            .into()
            .resolve(&self.preprocessor)
            .and_then(|prepared| self.compute_dominant_hsv(&prepared));
        Measurement::from_result("dominant_hsv", result, HsvColor::default)
    }

    /// Top named color categories, padded to the configured count
    ///
    /// On failure every slot is padding.
    pub fn dominant_colors<'a>(
        &self,
        source: impl Into<ImageSource<'a>>,
    ) -> Measurement<Vec<DominantColor>> {
        let top = self.config.top_colors;
        let result = source
            .into()
            .resolve(&self.preprocessor)
            .map(|prepared| self.compute_dominant_colors(&prepared));
        Measurement::from_result("dominant_colors", result, || {
            vec![DominantColor::default(); top]
        })
    }

    /// Channel-to-gray ratios; zero ratios and no tone on failure
    pub fn white_balance<'a>(&self, source: impl Into<ImageSource<'a>>) -> Measurement<WhiteBalance> {
        let result = source
            .into()
            .resolve(&self.preprocessor)
            .and_then(|prepared| self.white_balance.estimate(prepared.mean_rgb()));
        Measurement::from_result("white_balance", result, WhiteBalance::default)
    }

    /// 5th/95th percentile brightness spread; zeros and no class on failure
    pub fn dynamic_range<'a>(&self, source: impl Into<ImageSource<'a>>) -> Measurement<DynamicRange> {
        let result = source
            .into()
            .resolve(&self.preprocessor)
            .and_then(|prepared| self.dynamic_range.estimate(prepared.brightness()));
        Measurement::from_result("dynamic_range", result, DynamicRange::default)
    }

    /// 16 for 4-channel or wide-channel encodings, 8 otherwise; 0 on failure
    ///
    /// This reads the decoded color type, not the stored bit depth.
    pub fn color_depth<'a>(&self, source: impl Into<ImageSource<'a>>) -> Measurement<u8> {
        let result = source
            .into()
            .resolve(&self.preprocessor)
            .map(|prepared| depth_of(prepared.source_color()));
        Measurement::from_result("color_depth", result, || 0)
    }

    fn compute_average_hsv(&self, prepared: &PreparedImage) -> Result<HsvColor> {
        if prepared.pixel_count() == 0 {
            return Err(AnalysisError::degenerate("image has no pixels"));
        }
        let [r, g, b] = prepared.mean_rgb();
        Ok(self.converter.rgb_to_hsv(r, g, b).rounded())
    }

    fn compute_dominant_hsv(&self, prepared: &PreparedImage) -> Result<HsvColor> {
        let hues = prepared.hue().as_raw();
        let histogram = HueHistogram::uniform(hues, self.config.hue_bin_width)?;
        if histogram.total() == 0 {
            return Err(AnalysisError::degenerate("hue histogram is empty"));
        }
        let mode = histogram
            .mode_index()
            .ok_or_else(|| AnalysisError::computation("dominant_hsv", "histogram has no bins"))?;

        let saturation = prepared.saturation().as_raw();
        let value = prepared.value().as_raw();
        let mut sums = [0f64; 3];
        let mut count = 0usize;
        for (i, &hue) in hues.iter().enumerate() {
            if histogram.index_of(hue) == Some(mode) {
                sums[0] += hue as f64;
                sums[1] += saturation[i] as f64;
                sums[2] += value[i] as f64;
                count += 1;
            }
        }

        let bin = histogram.bins()[mode];
        debug!(low = bin.low, high = bin.high, count, "dominant hue bin");

        let n = count.max(1) as f64;
        Ok(HsvColor::new(sums[0] / n, sums[1] / n, sums[2] / n).rounded())
    }

    fn compute_dominant_colors(&self, prepared: &PreparedImage) -> Vec<DominantColor> {
        let mut counts = [0usize; ColorName::ALL.len()];
        let mut hue_sums = [0f64; ColorName::ALL.len()];
        let mut first_seen: Vec<ColorName> = Vec::with_capacity(ColorName::ALL.len());

        for &hue in prepared.hue().as_raw() {
            let name = ColorName::from_hue(hue);
            let slot = name.index();
            if counts[slot] == 0 {
                first_seen.push(name);
            }
            counts[slot] += 1;
            hue_sums[slot] += hue as f64;
        }

        // stable sort: equal counts keep first-seen order
        first_seen.sort_by(|a, b| counts[b.index()].cmp(&counts[a.index()]));

        let total = prepared.pixel_count().max(1) as f64;
        let mut ranked: Vec<DominantColor> = first_seen
            .into_iter()
            .take(self.config.top_colors)
            .map(|name| {
                let count = counts[name.index()];
                DominantColor {
                    name: Some(name),
                    percentage: constants::round_to(
                        count as f64 / total * 100.0,
                        constants::color::PERCENT_DECIMALS,
                    ),
                    mean_hue: constants::round_to(
                        hue_sums[name.index()] / count as f64,
                        constants::color::HSV_DECIMALS,
                    ),
                }
            })
            .collect();
        ranked.resize(self.config.top_colors, DominantColor::default());
        ranked
    }
}

fn depth_of(color: ColorType) -> u8 {
    match color {
        ColorType::Rgba8
        | ColorType::L16
        | ColorType::La16
        | ColorType::Rgb16
        | ColorType::Rgba16
        | ColorType::Rgb32F
        | ColorType::Rgba32F => depth::WIDE_BITS,
        _ => depth::STANDARD_BITS,
    }
}
