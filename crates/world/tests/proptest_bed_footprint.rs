//! Property tests for bed footprints and the touching-bed search.

use autosleep_core::PlayerId;
use autosleep_world::{
    find_touching_bed, BedAnchor, GameClock, Player, Tile, TileGrid, BED_HEIGHT_TILES,
    BED_WIDTH_TILES,
};
use glam::Vec2;
use proptest::prelude::*;

proptest! {
    /// Property: every cell of a placed bed resolves to the bed's anchor.
    #[test]
    fn every_bed_cell_resolves_to_anchor(
        anchor_x in 0i32..60,
        anchor_y in 0i32..20,
        dx in 0i32..BED_WIDTH_TILES,
        dy in 0i32..BED_HEIGHT_TILES,
    ) {
        let mut grid = TileGrid::new(64, 24);
        let anchor = BedAnchor::new(anchor_x, anchor_y);
        prop_assert!(grid.place_bed(anchor));

        let (x, y) = (anchor_x + dx, anchor_y + dy);
        let tile = *grid.get(x, y).expect("cell inside grid");
        prop_assert_eq!(BedAnchor::from_cell(x, y, &tile), anchor);
    }

    /// Property: a player who just lay down in a bed is touching that bed.
    #[test]
    fn sleeping_player_touches_own_bed(anchor_x in 2i32..50, anchor_y in 3i32..16) {
        let mut grid = TileGrid::new(64, 24);
        grid.fill_rect(0, anchor_y + BED_HEIGHT_TILES, 63, 23, Tile::SOLID);
        let anchor = BedAnchor::new(anchor_x, anchor_y);
        prop_assert!(grid.place_bed(anchor));

        let mut player = Player::new(PlayerId(1), Vec2::ZERO);
        player.start_sleeping(anchor);
        prop_assert_eq!(find_touching_bed(&grid, &player, 6), Some(anchor));
    }

    /// Property: clock hours always stay in 0..24 and survive a set/get round trip.
    #[test]
    fn clock_hours_round_trip(hours in 0.0f64..23.999) {
        let clock = GameClock::at_hours(hours);
        let read = clock.hours();
        prop_assert!((0.0..24.0).contains(&read));
        prop_assert!((read - hours).abs() < 1e-6);
    }
}
