//! Tile grid storage.
//!
//! Tiles are 16x16 pixels. Multi-tile furniture stores each cell's offset inside
//! the object as a frame coordinate, `offset * FRAME_STRIDE` pixels into the
//! sprite sheet.

use crate::bed::{BedAnchor, BED_HEIGHT_TILES, BED_WIDTH_TILES};
use serde::{Deserialize, Serialize};

/// Tile edge length in pixels.
pub const TILE_SIZE: i32 = 16;
/// Sprite-sheet stride between frames (16px cell + 2px padding).
pub const FRAME_STRIDE: i16 = 18;

/// Tile classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TileKind {
    /// Nothing here.
    #[default]
    Empty,
    /// Blocks movement and line of sight.
    Solid,
    /// Part of a bed.
    Bed,
    /// Non-blocking furniture (tables, chairs, ...).
    Furniture,
}

/// A single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Tile {
    /// What occupies the cell.
    pub kind: TileKind,
    /// Horizontal frame coordinate in pixels.
    pub frame_x: i16,
    /// Vertical frame coordinate in pixels.
    pub frame_y: i16,
}

impl Tile {
    /// An empty cell.
    pub const EMPTY: Self = Self {
        kind: TileKind::Empty,
        frame_x: 0,
        frame_y: 0,
    };

    /// A solid, unframed cell.
    pub const SOLID: Self = Self {
        kind: TileKind::Solid,
        frame_x: 0,
        frame_y: 0,
    };

    /// Returns true when something occupies the cell.
    pub fn has_tile(&self) -> bool {
        self.kind != TileKind::Empty
    }

    /// Returns true when the cell blocks line of sight.
    pub fn is_solid(&self) -> bool {
        self.kind == TileKind::Solid
    }

    /// Returns true when the cell is part of a bed.
    pub fn is_bed(&self) -> bool {
        self.kind == TileKind::Bed
    }

    /// Frame offset in cells (`frame / FRAME_STRIDE`).
    pub fn frame_cell(&self) -> (i32, i32) {
        (
            i32::from(self.frame_x / FRAME_STRIDE),
            i32::from(self.frame_y / FRAME_STRIDE),
        )
    }
}

/// Dense row-major tile storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileGrid {
    width: i32,
    height: i32,
    tiles: Vec<Tile>,
}

impl TileGrid {
    /// Create an empty grid.
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            width,
            height,
            tiles: vec![Tile::EMPTY; (width * height) as usize],
        }
    }

    /// Grid width in tiles.
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Grid height in tiles.
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Returns true when `(x, y)` lies inside the grid.
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width && y < self.height
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        self.in_bounds(x, y)
            .then(|| (y * self.width + x) as usize)
    }

    /// Tile at `(x, y)`, or `None` outside the grid.
    pub fn get(&self, x: i32, y: i32) -> Option<&Tile> {
        self.index(x, y).map(|idx| &self.tiles[idx])
    }

    /// Replace the tile at `(x, y)`. Returns false outside the grid.
    pub fn set(&mut self, x: i32, y: i32, tile: Tile) -> bool {
        match self.index(x, y) {
            Some(idx) => {
                self.tiles[idx] = tile;
                true
            }
            None => false,
        }
    }

    /// Fill an inclusive rectangle of cells, clipped to the grid.
    pub fn fill_rect(&mut self, min_x: i32, min_y: i32, max_x: i32, max_y: i32, tile: Tile) {
        for y in min_y.max(0)..=max_y.min(self.height - 1) {
            for x in min_x.max(0)..=max_x.min(self.width - 1) {
                self.set(x, y, tile);
            }
        }
    }

    /// Place a bed with its top-left cell at `anchor`.
    ///
    /// Returns false (and leaves the grid untouched) if any cell would fall outside.
    pub fn place_bed(&mut self, anchor: BedAnchor) -> bool {
        let fits = self.in_bounds(anchor.x, anchor.y)
            && self.in_bounds(
                anchor.x + BED_WIDTH_TILES - 1,
                anchor.y + BED_HEIGHT_TILES - 1,
            );
        if !fits {
            return false;
        }

        for dy in 0..BED_HEIGHT_TILES {
            for dx in 0..BED_WIDTH_TILES {
                self.set(
                    anchor.x + dx,
                    anchor.y + dy,
                    Tile {
                        kind: TileKind::Bed,
                        frame_x: dx as i16 * FRAME_STRIDE,
                        frame_y: dy as i16 * FRAME_STRIDE,
                    },
                );
            }
        }
        true
    }
}
