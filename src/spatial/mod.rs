//! Spatial layout of color categories
//!
//! This module tiles the canonical raster into a fixed 3x3 grid and
//! measures how green, blue, warm and gray each region is.

pub mod distribution;
pub mod grid;

pub use distribution::{SpatialDistribution, TileDistribution, TileRatios};
pub use grid::{grid_tiles, SpatialTile};
