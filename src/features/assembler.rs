//! Assembly of the fixed-shape feature vector
//!
//! [`FeatureAssembler`] prepares an image once, runs every statistic on the
//! shared [`PreparedImage`] and merges the results into a [`FeatureVector`]
//! that always carries the complete schema key set. A failed statistic
//! contributes its documented default and a [`Diagnostic`].

use crate::calibration::{DynamicRange, WhiteBalance};
use crate::color::{ColorStatistics, DominantColor, HsvColor, HueHistogram};
use crate::config::PipelineConfig;
use crate::constants::hue_buckets::EDGES;
use crate::detection::StructuralFeatures;
use crate::error::{AnalysisError, FailureKind, Result};
use crate::features::schema::{EDGE_DENSITY_KEY, HUE_BUCKET_KEYS, LINE_COUNT_KEY};
use crate::features::vector::FeatureVector;
use crate::measurement::Measurement;
use crate::preprocessing::{ImagePreprocessor, PreparedImage};
use crate::spatial::{SpatialDistribution, TileDistribution};
use serde::Serialize;
use std::path::Path;
use tracing::{debug, warn};

/// A statistic that fell back to its default
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub component: &'static str,
    pub kind: FailureKind,
    pub message: String,
}

/// Feature vector plus the failures behind any defaulted entries
#[derive(Debug, Clone, Serialize)]
pub struct FeatureExtraction {
    pub features: FeatureVector,
    pub diagnostics: Vec<Diagnostic>,
}

impl FeatureExtraction {
    /// True when every statistic was computed
    pub fn is_complete(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Every statistic of one image
#[derive(Debug)]
pub struct ImageAnalysis {
    pub average_hsv: Measurement<HsvColor>,
    pub dominant_hsv: Measurement<HsvColor>,
    pub dominant_colors: Measurement<Vec<DominantColor>>,
    pub white_balance: Measurement<WhiteBalance>,
    pub dynamic_range: Measurement<DynamicRange>,
    pub color_depth: Measurement<u8>,
    pub spatial: Measurement<Vec<TileDistribution>>,
    /// Fractions of hues in [0,60), [60,150), [150,260), [260,360]
    pub hue_buckets: Measurement<[f64; 4]>,
    pub edge_density: Measurement<f64>,
    pub line_count: Measurement<u32>,
}

impl ImageAnalysis {
    /// All defaults, every statistic blamed on the same upstream failure
    fn failed(error: AnalysisError, top_colors: usize) -> Self {
        fn defaulted<T>(value: T, error: &AnalysisError) -> Measurement<T> {
            Measurement::Defaulted {
                value,
                error: error.detached(),
            }
        }

        Self {
            average_hsv: defaulted(HsvColor::default(), &error),
            dominant_hsv: defaulted(HsvColor::default(), &error),
            dominant_colors: defaulted(vec![DominantColor::default(); top_colors], &error),
            white_balance: defaulted(WhiteBalance::default(), &error),
            dynamic_range: defaulted(DynamicRange::default(), &error),
            color_depth: defaulted(0, &error),
            spatial: defaulted(Vec::new(), &error),
            hue_buckets: defaulted([0.0; 4], &error),
            edge_density: defaulted(0.0, &error),
            line_count: defaulted(0, &error),
        }
    }

    /// Failures of the defaulted statistics, in vector order
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        let entries: [(&'static str, Option<&AnalysisError>); 10] = [
            ("average_hsv", self.average_hsv.error()),
            ("dominant_hsv", self.dominant_hsv.error()),
            ("dominant_colors", self.dominant_colors.error()),
            ("white_balance", self.white_balance.error()),
            ("dynamic_range", self.dynamic_range.error()),
            ("color_depth", self.color_depth.error()),
            ("spatial_distribution", self.spatial.error()),
            ("hue_buckets", self.hue_buckets.error()),
            ("edge_density", self.edge_density.error()),
            ("line_count", self.line_count.error()),
        ];
        entries
            .into_iter()
            .filter_map(|(component, error)| {
                error.map(|error| Diagnostic {
                    component,
                    kind: error.kind(),
                    message: error.to_string(),
                })
            })
            .collect()
    }

    /// Numeric feature vector with the full schema key set
    pub fn features(&self) -> FeatureVector {
        let mut vector = FeatureVector::with_schema_defaults();

        let avg = self.average_hsv.value();
        vector.set("avg_hue", avg.hue);
        vector.set("avg_sat", avg.saturation);
        vector.set("avg_val", avg.value);

        let dominant = self.dominant_hsv.value();
        vector.set("dominant_hue", dominant.hue);
        vector.set("dominant_sat", dominant.saturation);
        vector.set("dominant_val", dominant.value);

        let wb = self.white_balance.value();
        vector.set("wb_r", wb.red);
        vector.set("wb_g", wb.green);
        vector.set("wb_b", wb.blue);

        let dr = self.dynamic_range.value();
        vector.set("brightness_min", dr.min);
        vector.set("brightness_max", dr.max);
        vector.set("dynamic_range", dr.range);

        // only schema keys are touched; missing tiles keep their zeros
        for tile in self.spatial.value() {
            for (key, value) in tile.feature_entries() {
                if vector.get(&key).is_some() {
                    vector.set(key, value);
                }
            }
        }

        for (key, fraction) in HUE_BUCKET_KEYS.iter().zip(self.hue_buckets.value()) {
            vector.set(*key, *fraction);
        }

        vector.set(EDGE_DENSITY_KEY, *self.edge_density.value());
        vector.set(LINE_COUNT_KEY, *self.line_count.value());
        vector
    }

    pub fn into_extraction(self) -> FeatureExtraction {
        FeatureExtraction {
            features: self.features(),
            diagnostics: self.diagnostics(),
        }
    }
}

/// Runs the full pipeline on one image
#[derive(Debug, Clone)]
pub struct FeatureAssembler {
    preprocessor: ImagePreprocessor,
    color: ColorStatistics,
    spatial: SpatialDistribution,
    structural: StructuralFeatures,
    top_colors: usize,
}

impl Default for FeatureAssembler {
    fn default() -> Self {
        Self::build(&PipelineConfig::default())
    }
}

impl FeatureAssembler {
    /// Create an assembler after validating the configuration
    pub fn new(config: &PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: &PipelineConfig) -> Self {
        Self {
            preprocessor: ImagePreprocessor::new(config.preprocessing.clone()),
            color: ColorStatistics::from_pipeline(config),
            spatial: SpatialDistribution::from_pipeline(config),
            structural: StructuralFeatures::from_pipeline(config),
            top_colors: config.color.top_colors,
        }
    }

    pub fn preprocessor(&self) -> &ImagePreprocessor {
        &self.preprocessor
    }

    /// Feature vector of an image file; never fails
    pub fn extract(&self, path: &Path) -> FeatureExtraction {
        self.analyze(path).into_extraction()
    }

    /// Every statistic of an image file, decoding it once
    pub fn analyze(&self, path: &Path) -> ImageAnalysis {
        match self.preprocessor.prepare(path) {
            Ok(prepared) => self.analyze_prepared(&prepared),
            Err(error) => {
                warn!(path = %path.display(), %error, "image could not be prepared; using defaults");
                ImageAnalysis::failed(error, self.top_colors)
            }
        }
    }

    /// Every statistic of an already prepared image
    pub fn analyze_prepared(&self, prepared: &PreparedImage) -> ImageAnalysis {
        let analysis = ImageAnalysis {
            average_hsv: self.color.average_hsv(prepared),
            dominant_hsv: self.color.dominant_hsv(prepared),
            dominant_colors: self.color.dominant_colors(prepared),
            white_balance: self.color.white_balance(prepared),
            dynamic_range: self.color.dynamic_range(prepared),
            color_depth: self.color.color_depth(prepared),
            spatial: self.spatial.distribution(prepared),
            hue_buckets: Measurement::from_result("hue_buckets", hue_buckets(prepared), || [0.0; 4]),
            edge_density: self.structural.edge_density(prepared),
            line_count: self.structural.line_count(prepared),
        };
        debug!(
            defaulted = analysis.diagnostics().len(),
            "image analysis finished"
        );
        analysis
    }
}

/// Coarse 4-bucket hue histogram normalised to fractions
pub fn hue_buckets(prepared: &PreparedImage) -> Result<[f64; 4]> {
    let histogram = HueHistogram::with_edges(prepared.hue().as_raw(), &EDGES)?;
    let fractions = histogram.fractions();
    fractions.try_into().map_err(|bins: Vec<f64>| {
        AnalysisError::computation("hue_buckets", format!("expected 4 buckets, got {}", bins.len()))
    })
}
