//! Bed footprint math and the nearest touching-bed search.
//!
//! A bed occupies 4x2 tiles. Every cell carries its offset inside the bed as a
//! frame coordinate, so any cell can be traced back to the top-left anchor.

use crate::collision::{can_hit_line, Rect};
use crate::player::Player;
use crate::tile::{Tile, TileGrid, TILE_SIZE};
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Bed width in tiles.
pub const BED_WIDTH_TILES: i32 = 4;
/// Bed height in tiles.
pub const BED_HEIGHT_TILES: i32 = 2;

/// Top-left tile of a bed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BedAnchor {
    /// Tile column.
    pub x: i32,
    /// Tile row.
    pub y: i32,
}

impl BedAnchor {
    /// Create an anchor at tile `(x, y)`.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Resolve the anchor of the bed containing the cell at `(x, y)`.
    pub fn from_cell(x: i32, y: i32, tile: &Tile) -> Self {
        let (frame_x, frame_y) = tile.frame_cell();
        Self {
            x: x - frame_x.rem_euclid(BED_WIDTH_TILES),
            y: y - frame_y.rem_euclid(BED_HEIGHT_TILES),
        }
    }

    /// Pixel rectangle covered by the bed.
    pub fn bounds(&self) -> Rect {
        Rect::from_tiles(self.x, self.y, BED_WIDTH_TILES, BED_HEIGHT_TILES)
    }

    /// Center of the bed in tile units.
    pub fn center_tile(&self) -> (i32, i32) {
        (
            self.x + BED_WIDTH_TILES / 2,
            self.y + BED_HEIGHT_TILES / 2,
        )
    }

    /// Center of the bed in pixels.
    pub fn center(&self) -> Vec2 {
        let (cx, cy) = self.center_tile();
        Vec2::new((cx * TILE_SIZE) as f32, (cy * TILE_SIZE) as f32)
    }
}

/// Find the bed the player is touching.
///
/// Scans the square of `radius` tiles around the player's center tile, keeps beds
/// whose footprint intersects the player's hitbox and that are visible from the
/// player's center, and returns the one closest to the player's tile. On equal
/// distance the first bed found (x-major scan) wins.
pub fn find_touching_bed(grid: &TileGrid, player: &Player, radius: i32) -> Option<BedAnchor> {
    let center = player.center();
    let center_x = (center.x / TILE_SIZE as f32) as i32;
    let center_y = (center.y / TILE_SIZE as f32) as i32;
    let hitbox = player.hitbox();
    let radius = radius.max(0);

    let min_x = (center_x - radius).max(0);
    let max_x = (center_x + radius).min(grid.width() - 1);
    let min_y = (center_y - radius).max(0);
    let max_y = (center_y + radius).min(grid.height() - 1);

    let mut best: Option<(BedAnchor, i32)> = None;
    for x in min_x..=max_x {
        for y in min_y..=max_y {
            let Some(tile) = grid.get(x, y) else {
                continue;
            };
            if !tile.is_bed() {
                continue;
            }

            let anchor = BedAnchor::from_cell(x, y, tile);
            if !hitbox.intersects(&anchor.bounds()) {
                continue;
            }
            if !can_hit_line(grid, center, anchor.center()) {
                continue;
            }

            let (bed_x, bed_y) = anchor.center_tile();
            let dx = bed_x - center_x;
            let dy = bed_y - center_y;
            let dist_sq = dx * dx + dy * dy;

            if best.map_or(true, |(_, best_dist)| dist_sq < best_dist) {
                best = Some((anchor, dist_sq));
            }
        }
    }

    if let Some((anchor, dist_sq)) = best {
        tracing::trace!(
            player = player.id.0,
            bed_x = anchor.x,
            bed_y = anchor.y,
            dist_sq,
            "touching bed found"
        );
    }
    best.map(|(anchor, _)| anchor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::{TileKind, FRAME_STRIDE};
    use autosleep_core::PlayerId;

    fn floor_world() -> TileGrid {
        let mut grid = TileGrid::new(40, 20);
        grid.fill_rect(0, 6, 39, 19, Tile::SOLID);
        grid
    }

    #[test]
    fn anchor_from_frame_offset() {
        let tile = Tile {
            kind: TileKind::Bed,
            frame_x: 2 * FRAME_STRIDE,
            frame_y: FRAME_STRIDE,
        };
        assert_eq!(BedAnchor::from_cell(10, 5, &tile), BedAnchor::new(8, 4));
    }

    #[test]
    fn anchor_wraps_alternate_sprite_frames() {
        // Second style row in the sheet: frames continue past the bed size.
        let tile = Tile {
            kind: TileKind::Bed,
            frame_x: 5 * FRAME_STRIDE,
            frame_y: 3 * FRAME_STRIDE,
        };
        assert_eq!(BedAnchor::from_cell(10, 5, &tile), BedAnchor::new(9, 4));
    }

    #[test]
    fn player_standing_in_bed_finds_its_anchor() {
        let mut grid = floor_world();
        assert!(grid.place_bed(BedAnchor::new(8, 4)));
        let mut player = Player::new(PlayerId(1), Vec2::ZERO);
        player.stand_on_tile(10, 5);

        assert_eq!(
            find_touching_bed(&grid, &player, 6),
            Some(BedAnchor::new(8, 4))
        );
    }

    #[test]
    fn bed_out_of_reach_is_ignored() {
        let mut grid = floor_world();
        assert!(grid.place_bed(BedAnchor::new(20, 4)));
        let mut player = Player::new(PlayerId(1), Vec2::ZERO);
        player.stand_on_tile(10, 5);

        assert_eq!(find_touching_bed(&grid, &player, 6), None);
        assert_eq!(find_touching_bed(&grid, &player, 30), None, "not touching");
    }

    #[test]
    fn solid_block_between_player_and_bed_center_blocks() {
        let mut grid = floor_world();
        assert!(grid.place_bed(BedAnchor::new(8, 4)));
        let mut player = Player::new(PlayerId(1), Vec2::ZERO);
        // Overlaps the bed's left edge; center sits in tile (7, 4).
        player.position = Vec2::new(110.0, 54.0);
        assert_eq!(
            find_touching_bed(&grid, &player, 6),
            Some(BedAnchor::new(8, 4))
        );

        // A block wedged into the bed's top-left cell cuts the line to the bed center.
        grid.set(8, 4, Tile::SOLID);
        assert_eq!(find_touching_bed(&grid, &player, 6), None);
    }

    #[test]
    fn closest_of_two_beds_wins() {
        let mut grid = floor_world();
        assert!(grid.place_bed(BedAnchor::new(8, 2)));
        assert!(grid.place_bed(BedAnchor::new(8, 4)));
        let mut player = Player::new(PlayerId(1), Vec2::ZERO);
        // Touches both beds; center tile (10, 5) is the lower bed's center.
        player.position = Vec2::new(158.0, 60.0);

        assert_eq!(
            find_touching_bed(&grid, &player, 6),
            Some(BedAnchor::new(8, 4))
        );
    }

    #[test]
    fn equal_distance_keeps_first_scanned_bed() {
        let mut grid = floor_world();
        assert!(grid.place_bed(BedAnchor::new(4, 4)));
        assert!(grid.place_bed(BedAnchor::new(8, 4)));
        let mut player = Player::new(PlayerId(1), Vec2::ZERO);
        // Straddles the seam; center tile (8, 4) is equidistant from both centers.
        player.position = Vec2::new(126.0, 54.0);

        assert_eq!(
            find_touching_bed(&grid, &player, 6),
            Some(BedAnchor::new(4, 4))
        );
    }

    #[test]
    fn radius_limits_the_scanned_cells() {
        let mut grid = floor_world();
        assert!(grid.place_bed(BedAnchor::new(8, 4)));
        let mut player = Player::new(PlayerId(1), Vec2::ZERO);
        player.position = Vec2::new(110.0, 54.0);

        // Center tile (7, 4) holds no bed cell.
        assert_eq!(find_touching_bed(&grid, &player, 0), None);
        assert_eq!(
            find_touching_bed(&grid, &player, 1),
            Some(BedAnchor::new(8, 4))
        );
    }
}
