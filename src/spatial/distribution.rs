//! Per-tile color category ratios
//!
//! For every tile of the 3x3 grid four independent ratios are measured:
//! green-ish hue, blue-ish hue, warm hue and low saturation. A pixel may
//! count toward several of them (a dull orange is both warm and gray).

use crate::config::{PipelineConfig, SpatialConfig};
use crate::constants::spatial::{BLUE_HUE, GREEN_HUE, WARM_HIGH_HUE, WARM_LOW_HUE};
use crate::error::{AnalysisError, Result};
use crate::features::schema::{spatial_key, SPATIAL_CATEGORIES};
use crate::measurement::Measurement;
use crate::preprocessing::{ImagePreprocessor, ImageSource, PreparedImage};
use crate::spatial::grid::{grid_tiles, SpatialTile};
use serde::Serialize;

/// The four category ratios of one tile, each in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct TileRatios {
    pub green: f64,
    pub blue: f64,
    pub warm: f64,
    pub gray: f64,
}

/// Ratios measured on one tile
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TileDistribution {
    pub tile: SpatialTile,
    pub ratios: TileRatios,
}

impl TileDistribution {
    /// Feature keys and values of this tile, in green/blue/warm/gray order
    pub fn feature_entries(&self) -> [(String, f64); 4] {
        let values = [
            self.ratios.green,
            self.ratios.blue,
            self.ratios.warm,
            self.ratios.gray,
        ];
        std::array::from_fn(|i| {
            (
                spatial_key(SPATIAL_CATEGORIES[i], self.tile.row, self.tile.col),
                values[i],
            )
        })
    }
}

/// Spatial color distribution over the 3x3 grid
#[derive(Debug, Clone, Default)]
pub struct SpatialDistribution {
    preprocessor: ImagePreprocessor,
    config: SpatialConfig,
}

impl SpatialDistribution {
    pub fn new(preprocessor: ImagePreprocessor, config: SpatialConfig) -> Self {
        Self {
            preprocessor,
            config,
        }
    }

    pub fn from_pipeline(config: &PipelineConfig) -> Self {
        Self::new(
            ImagePreprocessor::new(config.preprocessing.clone()),
            config.spatial.clone(),
        )
    }

    /// Ratios of all nine tiles in row-major order
    ///
    /// On failure the result is empty; partial tile data is never returned.
    pub fn distribution<'a>(
        &self,
        source: impl Into<ImageSource<'a>>,
    ) -> Measurement<Vec<TileDistribution>> {
        let result = source
            .into()
            .resolve(&self.preprocessor)
            .and_then(|prepared| self.compute(&prepared));
        Measurement::from_result("spatial_distribution", result, Vec::new)
    }

    fn compute(&self, prepared: &PreparedImage) -> Result<Vec<TileDistribution>> {
        let (width, height) = prepared.dimensions();
        let hue = prepared.hue();
        let saturation = prepared.saturation();
        if saturation.dimensions() != (width, height) {
            return Err(AnalysisError::computation(
                "spatial_distribution",
                "hue and saturation planes differ in size",
            ));
        }

        let gray_limit = self.config.gray_saturation_threshold;
        let tiles = grid_tiles(width, height)
            .into_iter()
            .map(|tile| {
                let mut counts = [0usize; 4];
                for y in tile.y..tile.y + tile.height {
                    for x in tile.x..tile.x + tile.width {
                        let h = hue.get_pixel(x, y).0[0];
                        let s = saturation.get_pixel(x, y).0[0];
                        counts[0] += within(h, GREEN_HUE) as usize;
                        counts[1] += within(h, BLUE_HUE) as usize;
                        counts[2] += is_warm(h) as usize;
                        counts[3] += (s <= gray_limit) as usize;
                    }
                }
                let total = tile.pixel_count().max(1) as f64;
                TileDistribution {
                    tile,
                    ratios: TileRatios {
                        green: counts[0] as f64 / total,
                        blue: counts[1] as f64 / total,
                        warm: counts[2] as f64 / total,
                        gray: counts[3] as f64 / total,
                    },
                }
            })
            .collect();
        Ok(tiles)
    }
}

/// Inclusive hue range test
fn within(hue: f32, (low, high): (f32, f32)) -> bool {
    hue >= low && hue <= high
}

fn is_warm(hue: f32) -> bool {
    within(hue, WARM_LOW_HUE) || (hue >= WARM_HIGH_HUE.0 && hue < WARM_HIGH_HUE.1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, Rgb, RgbImage};

    fn prepare(image: RgbImage) -> PreparedImage {
        ImagePreprocessor::default()
            .prepare_image(&DynamicImage::ImageRgb8(image))
            .unwrap()
    }

    #[test]
    fn test_gray_image_all_gray() {
        let prepared = prepare(RgbImage::from_pixel(150, 150, Rgb([128, 128, 128])));
        let tiles = SpatialDistribution::default().distribution(&prepared).into_value();
        assert_eq!(tiles.len(), 9);
        for tile in &tiles {
            assert_eq!(tile.ratios.gray, 1.0);
            assert_eq!(tile.ratios.green, 0.0);
            // hue 0 of a gray pixel counts as warm
            assert_eq!(tile.ratios.warm, 1.0);
        }
    }

    #[test]
    fn test_half_green_half_blue_columns() {
        let prepared = prepare(RgbImage::from_fn(150, 150, |x, _| {
            if x < 75 {
                Rgb([0, 200, 0])
            } else {
                Rgb([0, 0, 200])
            }
        }));
        let tiles = SpatialDistribution::default().distribution(&prepared).into_value();
        assert_eq!(tiles[0].ratios.green, 1.0);
        assert_eq!(tiles[2].ratios.blue, 1.0);
        assert_eq!(tiles[1].ratios.green, 0.5);
        assert_eq!(tiles[1].ratios.blue, 0.5);
        for tile in &tiles {
            assert!((tile.ratios.green + tile.ratios.blue - 1.0).abs() < 1e-12);
            assert_eq!(tile.ratios.gray, 0.0);
        }
    }

    #[test]
    fn test_ratios_in_unit_interval() {
        let prepared = prepare(RgbImage::from_fn(101, 77, |x, y| {
            Rgb([(x * 5) as u8, (y * 3) as u8, ((x * y) % 256) as u8])
        }));
        let tiles = SpatialDistribution::default().distribution(&prepared).into_value();
        for t in &tiles {
            for r in [t.ratios.green, t.ratios.blue, t.ratios.warm, t.ratios.gray] {
                assert!((0.0..=1.0).contains(&r));
            }
        }
        let counted: usize = tiles.iter().map(|t| t.tile.pixel_count()).sum();
        assert_eq!(counted, prepared.pixel_count());
    }

    #[test]
    fn test_gray_threshold_is_configurable() {
        // saturation byte 102, exactly 40 %
        let prepared = prepare(RgbImage::from_pixel(30, 30, Rgb([255, 153, 153])));
        let strict = SpatialDistribution::new(
            ImagePreprocessor::default(),
            SpatialConfig {
                gray_saturation_threshold: 10.0,
            },
        );
        let loose = SpatialDistribution::default();
        assert_eq!(strict.distribution(&prepared).into_value()[0].ratios.gray, 0.0);
        assert_eq!(loose.distribution(&prepared).into_value()[0].ratios.gray, 1.0);
    }

    #[test]
    fn test_hue_boundaries() {
        assert!(within(60.0, GREEN_HUE) && within(150.0, GREEN_HUE));
        assert!(!within(150.01, GREEN_HUE));
        assert!(within(180.0, BLUE_HUE) && within(260.0, BLUE_HUE));
        assert!(is_warm(0.0) && is_warm(60.0) && is_warm(300.0) && is_warm(359.9));
        assert!(!is_warm(61.0) && !is_warm(299.9));
    }

    #[test]
    fn test_feature_entries() {
        let entry = TileDistribution {
            tile: grid_tiles(150, 150)[7],
            ratios: TileRatios {
                green: 0.1,
                blue: 0.2,
                warm: 0.3,
                gray: 0.4,
            },
        };
        let keys: Vec<String> = entry.feature_entries().iter().map(|(k, _)| k.clone()).collect();
        assert_eq!(
            keys,
            vec!["green_row2_col1", "blue_row2_col1", "warm_row2_col1", "gray_row2_col1"]
        );
    }

    #[test]
    fn test_decode_failure_is_empty() {
        let result = SpatialDistribution::default().distribution(std::path::Path::new("missing.jpg"));
        assert!(result.is_defaulted());
        assert!(result.value().is_empty());
    }
}
