//! Small hand-built worlds shared by tests.

use autosleep_core::{parse_time, PlayerId};
use autosleep_world::{BedAnchor, GameClock, Player, Tile, TileGrid};
use glam::Vec2;

/// Width of the bedroom fixture in tiles.
pub const BEDROOM_WIDTH: i32 = 40;
/// Height of the bedroom fixture in tiles.
pub const BEDROOM_HEIGHT: i32 = 16;
/// First solid row of the bedroom floor.
pub const BEDROOM_FLOOR_Y: i32 = 10;

/// A walled room with a floor and one bed.
#[derive(Debug, Clone)]
pub struct Bedroom {
    /// Tiles.
    pub grid: TileGrid,
    /// The room's bed.
    pub bed: BedAnchor,
}

impl Bedroom {
    /// A player standing in the middle of the bed.
    pub fn player_in_bed(&self, id: PlayerId) -> Player {
        let mut player = Player::new(id, Vec2::ZERO);
        let (cx, _) = self.bed.center_tile();
        player.stand_on_tile(cx, BEDROOM_FLOOR_Y - 1);
        player
    }

    /// A player standing on the floor near the left wall, far from the bed.
    pub fn player_away_from_bed(&self, id: PlayerId) -> Player {
        let mut player = Player::new(id, Vec2::ZERO);
        player.stand_on_tile(5, BEDROOM_FLOOR_Y - 1);
        player
    }
}

/// Build the bedroom: ceiling, walls, floor and a bed resting on the floor at x = 18.
pub fn bedroom() -> Bedroom {
    let mut grid = TileGrid::new(BEDROOM_WIDTH, BEDROOM_HEIGHT);
    let right = BEDROOM_WIDTH - 1;
    let bottom = BEDROOM_HEIGHT - 1;
    grid.fill_rect(0, 0, right, 0, Tile::SOLID);
    grid.fill_rect(0, 0, 0, bottom, Tile::SOLID);
    grid.fill_rect(right, 0, right, bottom, Tile::SOLID);
    grid.fill_rect(0, BEDROOM_FLOOR_Y, right, bottom, Tile::SOLID);

    let bed = BedAnchor::new(18, BEDROOM_FLOOR_Y - 2);
    let placed = grid.place_bed(bed);
    debug_assert!(placed, "bedroom bed must fit");
    Bedroom { grid, bed }
}

/// Clock showing the given time (any form the window parser accepts).
///
/// Panics on unparseable input; fixtures only take literals.
pub fn clock_at(time: &str) -> GameClock {
    let minutes = parse_time(time).unwrap_or_else(|err| panic!("bad fixture time {time:?}: {err}"));
    GameClock::at_hours(f64::from(minutes) / 60.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use autosleep_world::find_touching_bed;

    #[test]
    fn bedroom_player_placements() {
        let room = bedroom();
        let sleeper = room.player_in_bed(PlayerId(1));
        assert_eq!(find_touching_bed(&room.grid, &sleeper, 6), Some(room.bed));

        let wanderer = room.player_away_from_bed(PlayerId(2));
        assert_eq!(find_touching_bed(&room.grid, &wanderer, 64), None);
    }

    #[test]
    fn clock_at_accepts_clock_and_decimal_forms() {
        assert_eq!(clock_at("22:00").clock_label(), "22:00");
        assert_eq!(clock_at("19.5").clock_label(), "19:30");
    }
}
