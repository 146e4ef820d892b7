//! Human-readable per-image report row
//!
//! A report merges EXIF fields, the color statistics with their labels,
//! named dominant colors, per-row band percentages and the scene category
//! into one ordered, serializable row. Writing rows to any output format
//! is left to the caller.

use crate::calibration::{DynamicRange, WhiteBalance};
use crate::color::{DominantColor, HsvColor};
use crate::config::PipelineConfig;
use crate::constants::{self, spatial::GRID_SIZE};
use crate::error::Result;
use crate::exif::{CameraMetadata, ExifExtractor};
use crate::features::assembler::{Diagnostic, FeatureAssembler, ImageAnalysis};
use crate::features::classifier::{categorize, SceneCategory, SceneClassifier};
use crate::features::vector::FeatureVector;
use crate::spatial::TileDistribution;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;
use tracing::warn;

/// Mean tile ratio of each grid row, in percent (top, middle, bottom)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct RowBands {
    pub green: [f64; 3],
    pub blue: [f64; 3],
    pub warm: [f64; 3],
    pub gray: [f64; 3],
}

impl RowBands {
    /// Average the tiles of each row; rows without tiles stay at zero
    pub fn from_tiles(tiles: &[TileDistribution]) -> Self {
        let mut sums = [[0f64; 4]; 3];
        for t in tiles.iter().filter(|t| t.tile.row < 3) {
            let row = &mut sums[t.tile.row as usize];
            row[0] += t.ratios.green;
            row[1] += t.ratios.blue;
            row[2] += t.ratios.warm;
            row[3] += t.ratios.gray;
        }

        let band = |category: usize| -> [f64; 3] {
            std::array::from_fn(|row| {
                let mean = sums[row][category] / GRID_SIZE as f64;
                constants::round_to(mean * 100.0, constants::color::PERCENT_DECIMALS)
            })
        };
        Self {
            green: band(0),
            blue: band(1),
            warm: band(2),
            gray: band(3),
        }
    }
}

/// One report row
#[derive(Debug, Clone, Serialize)]
pub struct ImageReport {
    pub file_name: String,
    pub camera: CameraMetadata,
    /// Set when EXIF could not be read
    pub camera_error: Option<String>,
    pub average_hsv: HsvColor,
    pub dominant_hsv: HsvColor,
    pub top_colors: Vec<DominantColor>,
    pub top_colors_summary: String,
    pub white_balance: WhiteBalance,
    pub white_balance_label: String,
    pub dynamic_range: DynamicRange,
    pub dynamic_range_label: String,
    pub color_depth: u8,
    pub bands: RowBands,
    pub scene_category: SceneCategory,
    pub features: FeatureVector,
    pub diagnostics: Vec<Diagnostic>,
}

impl ImageReport {
    /// Flat, ordered column → value view of the row
    pub fn to_row(&self) -> IndexMap<String, Value> {
        let mut row = IndexMap::new();
        let text = |value: &Option<String>| json!(value.clone().unwrap_or_default());
        let note = match (&self.camera_error, self.camera.note) {
            (Some(error), _) => error.clone(),
            (None, Some(note)) => note.label().to_string(),
            (None, None) => String::new(),
        };

        row.insert("file_name".into(), json!(self.file_name));
        row.insert("make".into(), text(&self.camera.make));
        row.insert("model".into(), text(&self.camera.model));
        row.insert("date_time_original".into(), text(&self.camera.date_time_original));
        row.insert("gps_latitude".into(), json!(self.camera.gps_latitude));
        row.insert("gps_longitude".into(), json!(self.camera.gps_longitude));
        row.insert("note".into(), json!(note));

        row.insert("avg_hue".into(), json!(self.average_hsv.hue));
        row.insert("avg_sat".into(), json!(self.average_hsv.saturation));
        row.insert("avg_val".into(), json!(self.average_hsv.value));
        row.insert("dominant_hue".into(), json!(self.dominant_hsv.hue));
        row.insert("dominant_sat".into(), json!(self.dominant_hsv.saturation));
        row.insert("dominant_val".into(), json!(self.dominant_hsv.value));

        for (i, color) in self.top_colors.iter().enumerate() {
            let rank = i + 1;
            row.insert(format!("top{}_color", rank), json!(color.label()));
            row.insert(format!("top{}_pct", rank), json!(color.percentage));
            row.insert(format!("top{}_hue", rank), json!(color.mean_hue));
        }
        row.insert("top_colors".into(), json!(self.top_colors_summary));

        row.insert("wb_r".into(), json!(self.white_balance.red));
        row.insert("wb_g".into(), json!(self.white_balance.green));
        row.insert("wb_b".into(), json!(self.white_balance.blue));
        row.insert("wb_type".into(), json!(self.white_balance_label));
        row.insert("brightness_min".into(), json!(self.dynamic_range.min));
        row.insert("brightness_max".into(), json!(self.dynamic_range.max));
        row.insert("dynamic_range".into(), json!(self.dynamic_range.range));
        row.insert("dynamic_range_class".into(), json!(self.dynamic_range_label));
        row.insert("color_depth".into(), json!(self.color_depth));

        let names = ["top", "middle", "bottom"];
        for (category, band) in [
            ("green", &self.bands.green),
            ("blue", &self.bands.blue),
            ("warm", &self.bands.warm),
            ("gray", &self.bands.gray),
        ] {
            for (name, value) in names.iter().zip(band) {
                row.insert(format!("{}_{}_pct", category, name), json!(value));
            }
        }

        row.insert("scene_category".into(), json!(self.scene_category.label()));
        row
    }
}

/// `"Name (pct% – hue°) | …"` summary of the ranked colors
pub fn top_colors_summary(colors: &[DominantColor]) -> String {
    colors
        .iter()
        .map(|c| format!("{} ({:.1}% – {:.1}°)", c.label(), c.percentage, c.mean_hue))
        .collect::<Vec<_>>()
        .join(" | ")
}

/// Builds report rows for image files
#[derive(Clone)]
pub struct ReportBuilder {
    assembler: FeatureAssembler,
    exif: ExifExtractor,
    classifier: Option<Arc<dyn SceneClassifier>>,
}

impl ReportBuilder {
    pub fn new(config: &PipelineConfig) -> Result<Self> {
        Ok(Self {
            assembler: FeatureAssembler::new(config)?,
            exif: ExifExtractor::new(),
            classifier: None,
        })
    }

    /// Attach a scene classifier
    pub fn with_classifier(mut self, classifier: Arc<dyn SceneClassifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    pub fn assembler(&self) -> &FeatureAssembler {
        &self.assembler
    }

    /// Report of one image; never fails
    pub fn build(&self, path: &Path) -> ImageReport {
        let (camera, camera_error) = match self.exif.extract(path) {
            Ok(metadata) => (metadata, None),
            Err(error) => {
                warn!(path = %path.display(), %error, "EXIF extraction failed");
                (CameraMetadata::default(), Some(format!("Error: {}", error)))
            }
        };
        let analysis = self.assembler.analyze(path);
        self.assemble(file_name(path), camera, camera_error, analysis)
    }

    fn assemble(
        &self,
        file_name: String,
        camera: CameraMetadata,
        camera_error: Option<String>,
        analysis: ImageAnalysis,
    ) -> ImageReport {
        let features = analysis.features();
        let diagnostics = analysis.diagnostics();
        let scene_category = categorize(self.classifier.as_deref(), &features);

        let tone = analysis.white_balance.value().tone;
        let white_balance_label = match (analysis.white_balance.error(), tone) {
            (Some(error), _) => format!("Error: {}", error),
            (None, Some(tone)) => tone.label().to_string(),
            (None, None) => String::new(),
        };
        let class = analysis.dynamic_range.value().class;
        let dynamic_range_label = match (analysis.dynamic_range.error(), class) {
            (Some(error), _) => format!("Error analysing brightness: {}", error),
            (None, Some(class)) => class.label().to_string(),
            (None, None) => String::new(),
        };

        let top_colors = analysis.dominant_colors.value().clone();
        ImageReport {
            file_name,
            camera,
            camera_error,
            average_hsv: *analysis.average_hsv.value(),
            dominant_hsv: *analysis.dominant_hsv.value(),
            top_colors_summary: top_colors_summary(&top_colors),
            top_colors,
            white_balance: *analysis.white_balance.value(),
            white_balance_label,
            dynamic_range: *analysis.dynamic_range.value(),
            dynamic_range_label,
            color_depth: *analysis.color_depth.value(),
            bands: RowBands::from_tiles(analysis.spatial.value()),
            scene_category,
            features,
            diagnostics,
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
