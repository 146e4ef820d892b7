//! Fixed 3x3 tiling of the canonical raster
//!
//! Row and column boundaries come from integer division by the grid size;
//! the last row and column absorb the remainder, so the tiles cover every
//! pixel exactly once.

use crate::constants::spatial::GRID_SIZE;
use serde::Serialize;

/// One rectangular region of the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SpatialTile {
    pub row: u32,
    pub col: u32,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl SpatialTile {
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// `row{r}_col{c}` suffix used in feature keys
    pub fn label(&self) -> String {
        format!("row{}_col{}", self.row, self.col)
    }

    /// Whether (x, y) lies inside the tile
    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }
}

/// Tiles of a `width` x `height` raster in row-major order
pub fn grid_tiles(width: u32, height: u32) -> Vec<SpatialTile> {
    let row_height = height / GRID_SIZE;
    let col_width = width / GRID_SIZE;

    let span = |index: u32, step: u32, extent: u32| {
        let start = index * step;
        let end = if index + 1 < GRID_SIZE { start + step } else { extent };
        (start, end - start)
    };

    let mut tiles = Vec::with_capacity((GRID_SIZE * GRID_SIZE) as usize);
    for row in 0..GRID_SIZE {
        let (y, tile_height) = span(row, row_height, height);
        for col in 0..GRID_SIZE {
            let (x, tile_width) = span(col, col_width, width);
            tiles.push(SpatialTile {
                row,
                col,
                x,
                y,
                width: tile_width,
                height: tile_height,
            });
        }
    }
    tiles
}
