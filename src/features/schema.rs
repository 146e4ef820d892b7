//! Canonical feature key list
//!
//! Classifiers index the vector by key name, so the key set and its order
//! are a versioned contract. Bump [`FEATURE_SCHEMA_VERSION`] whenever a key
//! is added, removed, renamed or changes scale.

use crate::constants::spatial::GRID_SIZE;
use std::sync::OnceLock;

pub const FEATURE_SCHEMA_VERSION: u32 = 1;

/// Whole-image color keys, in vector order
pub const COLOR_KEYS: [&str; 12] = [
    "avg_hue",
    "avg_sat",
    "avg_val",
    "dominant_hue",
    "dominant_sat",
    "dominant_val",
    "wb_r",
    "wb_g",
    "wb_b",
    "brightness_min",
    "brightness_max",
    "dynamic_range",
];

/// Spatial ratio categories, in per-tile order
pub const SPATIAL_CATEGORIES: [&str; 4] = ["green", "blue", "warm", "gray"];

/// Coarse hue histogram keys (warm, green, blue, other)
pub const HUE_BUCKET_KEYS: [&str; 4] = [
    "hue_pct_warm",
    "hue_pct_green",
    "hue_pct_blue",
    "hue_pct_other",
];

pub const EDGE_DENSITY_KEY: &str = "edge_density";
pub const LINE_COUNT_KEY: &str = "line_count";

pub const FEATURE_COUNT: usize = COLOR_KEYS.len()
    + SPATIAL_CATEGORIES.len() * (GRID_SIZE * GRID_SIZE) as usize
    + HUE_BUCKET_KEYS.len()
    + 2;

/// Key of one spatial ratio
pub fn spatial_key(category: &str, row: u32, col: u32) -> String {
    format!("{}_row{}_col{}", category, row, col)
}

/// Spatial keys, tile by tile in row-major order
pub fn spatial_keys() -> Vec<String> {
    let mut keys = Vec::with_capacity(SPATIAL_CATEGORIES.len() * (GRID_SIZE * GRID_SIZE) as usize);
    for row in 0..GRID_SIZE {
        for col in 0..GRID_SIZE {
            for category in SPATIAL_CATEGORIES {
                keys.push(spatial_key(category, row, col));
            }
        }
    }
    keys
}

/// Every feature key in vector order
pub fn feature_keys() -> &'static [String] {
    static KEYS: OnceLock<Vec<String>> = OnceLock::new();
    KEYS.get_or_init(|| {
        let mut keys: Vec<String> = COLOR_KEYS.iter().map(|k| k.to_string()).collect();
        keys.extend(spatial_keys());
        keys.extend(HUE_BUCKET_KEYS.iter().map(|k| k.to_string()));
        keys.push(EDGE_DENSITY_KEY.to_string());
        keys.push(LINE_COUNT_KEY.to_string());
        keys
    })
}
