//! Pixel-space rectangles and tile line-of-sight queries.

use crate::tile::{Tile, TileGrid, TILE_SIZE};
use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
}

impl Rect {
    /// Create a new rectangle.
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        debug_assert!(width >= 0 && height >= 0);
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle covering `width x height` tiles starting at tile `(tile_x, tile_y)`.
    pub fn from_tiles(tile_x: i32, tile_y: i32, width: i32, height: i32) -> Self {
        Self::new(
            tile_x * TILE_SIZE,
            tile_y * TILE_SIZE,
            width * TILE_SIZE,
            height * TILE_SIZE,
        )
    }

    /// Right edge (exclusive).
    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    /// Bottom edge (exclusive).
    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// Tests overlap with another rectangle. Rectangles that only share an edge do
    /// not intersect.
    pub fn intersects(&self, other: &Self) -> bool {
        other.x < self.right()
            && self.x < other.right()
            && other.y < self.bottom()
            && self.y < other.bottom()
    }

    /// Center point.
    pub fn center(&self) -> Vec2 {
        Vec2::new(
            self.x as f32 + self.width as f32 / 2.0,
            self.y as f32 + self.height as f32 / 2.0,
        )
    }
}

/// Tile containing the pixel-space point.
pub fn tile_at(point: Vec2) -> IVec2 {
    IVec2::new(
        (point.x / TILE_SIZE as f32).floor() as i32,
        (point.y / TILE_SIZE as f32).floor() as i32,
    )
}

/// Returns true when no solid tile lies on the segment `from -> to` (pixels).
///
/// Walks every tile the segment passes through (DDA). Cells outside the grid block
/// the line.
pub fn can_hit_line(grid: &TileGrid, from: Vec2, to: Vec2) -> bool {
    let start = from / TILE_SIZE as f32;
    let end = to / TILE_SIZE as f32;
    let dir = end - start;

    let mut cell = tile_at(from);
    let target = tile_at(to);

    let step = IVec2::new(
        if dir.x > 0.0 { 1 } else { -1 },
        if dir.y > 0.0 { 1 } else { -1 },
    );

    // Distance along the segment (t in 0..1) to cross one tile in each axis.
    let delta = Vec2::new(
        if dir.x != 0.0 {
            (1.0 / dir.x).abs()
        } else {
            f32::MAX
        },
        if dir.y != 0.0 {
            (1.0 / dir.y).abs()
        } else {
            f32::MAX
        },
    );

    let mut t_max = Vec2::new(
        if dir.x > 0.0 {
            ((cell.x + 1) as f32 - start.x) / dir.x
        } else if dir.x < 0.0 {
            (cell.x as f32 - start.x) / dir.x
        } else {
            f32::MAX
        },
        if dir.y > 0.0 {
            ((cell.y + 1) as f32 - start.y) / dir.y
        } else if dir.y < 0.0 {
            (cell.y as f32 - start.y) / dir.y
        } else {
            f32::MAX
        },
    );

    let max_steps = (target.x - cell.x).abs() + (target.y - cell.y).abs();
    for _ in 0..=max_steps {
        if blocks_sight(grid, cell) {
            return false;
        }
        if cell == target {
            return true;
        }

        if t_max.x < t_max.y {
            cell.x += step.x;
            t_max.x += delta.x;
        } else {
            cell.y += step.y;
            t_max.y += delta.y;
        }
    }

    true
}

fn blocks_sight(grid: &TileGrid, cell: IVec2) -> bool {
    grid.get(cell.x, cell.y).map_or(true, Tile::is_solid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_intersection_is_strict() {
        let a = Rect::new(0, 0, 16, 16);
        assert!(a.intersects(&Rect::new(8, 8, 16, 16)));
        assert!(!a.intersects(&Rect::new(16, 0, 16, 16)), "shared edge");
        assert!(!a.intersects(&Rect::new(0, 40, 4, 4)));
    }

    #[test]
    fn rect_from_tiles_scales_by_tile_size() {
        let rect = Rect::from_tiles(8, 4, 4, 2);
        assert_eq!(rect, Rect::new(128, 64, 64, 32));
        assert_eq!(rect.center(), Vec2::new(160.0, 80.0));
    }

    #[test]
    fn open_line_is_clear() {
        let grid = TileGrid::new(16, 16);
        assert!(can_hit_line(
            &grid,
            Vec2::new(24.0, 24.0),
            Vec2::new(200.0, 120.0)
        ));
        // Degenerate segment.
        assert!(can_hit_line(
            &grid,
            Vec2::new(40.0, 40.0),
            Vec2::new(40.0, 40.0)
        ));
    }

    #[test]
    fn wall_blocks_line() {
        let mut grid = TileGrid::new(16, 16);
        grid.fill_rect(5, 0, 5, 15, Tile::SOLID);
        assert!(!can_hit_line(
            &grid,
            Vec2::new(24.0, 40.0),
            Vec2::new(150.0, 40.0)
        ));
        // Same side of the wall.
        assert!(can_hit_line(
            &grid,
            Vec2::new(24.0, 40.0),
            Vec2::new(70.0, 100.0)
        ));
    }

    #[test]
    fn leaving_the_grid_blocks_line() {
        let grid = TileGrid::new(4, 4);
        assert!(!can_hit_line(
            &grid,
            Vec2::new(8.0, 8.0),
            Vec2::new(100.0, 8.0)
        ));
    }
}
