//! Player body and sleep state as seen by gameplay systems.

use crate::bed::{BedAnchor, BED_HEIGHT_TILES};
use crate::collision::Rect;
use crate::tile::TILE_SIZE;
use autosleep_core::PlayerId;
use glam::Vec2;

/// Player hitbox width in pixels.
pub const PLAYER_WIDTH: i32 = 20;
/// Player hitbox height in pixels.
pub const PLAYER_HEIGHT: i32 = 42;

/// A player body in the tile world.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    /// Session identifier.
    pub id: PlayerId,
    /// Top-left corner of the hitbox in pixels.
    pub position: Vec2,
    /// Hitbox width in pixels.
    pub width: i32,
    /// Hitbox height in pixels.
    pub height: i32,
    /// True while the player is dead and waiting to respawn.
    pub dead: bool,
    sleeping_in: Option<BedAnchor>,
}

impl Player {
    /// Spawn a living, awake player with its hitbox at `position`.
    pub fn new(id: PlayerId, position: Vec2) -> Self {
        Self {
            id,
            position,
            width: PLAYER_WIDTH,
            height: PLAYER_HEIGHT,
            dead: false,
            sleeping_in: None,
        }
    }

    /// Collision rectangle in pixels.
    pub fn hitbox(&self) -> Rect {
        Rect::new(
            self.position.x as i32,
            self.position.y as i32,
            self.width,
            self.height,
        )
    }

    /// Center of the hitbox in pixels.
    pub fn center(&self) -> Vec2 {
        self.position + Vec2::new(self.width as f32 / 2.0, self.height as f32 / 2.0)
    }

    /// Place the player with its feet on the bottom edge of tile `(x, y)`,
    /// horizontally centered on that tile.
    pub fn stand_on_tile(&mut self, x: i32, y: i32) {
        self.position = Vec2::new(
            (x * TILE_SIZE + TILE_SIZE / 2 - self.width / 2) as f32,
            ((y + 1) * TILE_SIZE - self.height) as f32,
        );
    }

    /// Returns true while the player is asleep.
    pub fn is_sleeping(&self) -> bool {
        self.sleeping_in.is_some()
    }

    /// Bed the player is asleep in, if any.
    pub fn sleeping_in(&self) -> Option<BedAnchor> {
        self.sleeping_in
    }

    /// Lie down in `bed`, snapping the body onto the mattress.
    pub fn start_sleeping(&mut self, bed: BedAnchor) {
        let center = bed.center();
        self.position = Vec2::new(
            center.x - self.width as f32 / 2.0,
            ((bed.y + BED_HEIGHT_TILES) * TILE_SIZE - self.height) as f32,
        );
        self.sleeping_in = Some(bed);
        tracing::debug!(player = self.id.0, bed_x = bed.x, bed_y = bed.y, "player fell asleep");
    }

    /// Wake up. Does nothing when already awake.
    pub fn stop_sleeping(&mut self) {
        if let Some(bed) = self.sleeping_in.take() {
            tracing::debug!(player = self.id.0, bed_x = bed.x, bed_y = bed.y, "player woke up");
        }
    }

    /// Kill the player. The sleep state is left for gameplay systems to resolve.
    pub fn kill(&mut self) {
        self.dead = true;
    }

    /// Bring the player back to life at `position`.
    pub fn respawn(&mut self, position: Vec2) {
        self.dead = false;
        self.position = position;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hitbox_and_center_follow_position() {
        let player = Player::new(PlayerId(7), Vec2::new(100.0, 50.0));
        assert_eq!(player.hitbox(), Rect::new(100, 50, 20, 42));
        assert_eq!(player.center(), Vec2::new(110.0, 71.0));
    }

    #[test]
    fn stand_on_tile_puts_feet_on_row_bottom() {
        let mut player = Player::new(PlayerId(1), Vec2::ZERO);
        player.stand_on_tile(10, 5);
        assert_eq!(player.position, Vec2::new(158.0, 54.0));
        assert_eq!(player.hitbox().bottom(), 96);
    }

    #[test]
    fn sleeping_snaps_into_bed() {
        let mut player = Player::new(PlayerId(1), Vec2::new(300.0, 10.0));
        let bed = BedAnchor::new(8, 4);
        player.start_sleeping(bed);
        assert!(player.is_sleeping());
        assert_eq!(player.sleeping_in(), Some(bed));
        assert!(player.hitbox().intersects(&bed.bounds()));

        player.stop_sleeping();
        assert!(!player.is_sleeping());
        // Waking leaves the body in place.
        assert!(player.hitbox().intersects(&bed.bounds()));
    }

    #[test]
    fn death_and_respawn() {
        let mut player = Player::new(PlayerId(1), Vec2::ZERO);
        player.start_sleeping(BedAnchor::new(0, 0));
        player.kill();
        assert!(player.dead);
        assert!(player.is_sleeping());
        player.stop_sleeping();

        player.respawn(Vec2::new(32.0, 32.0));
        assert!(!player.dead);
        assert_eq!(player.position, Vec2::new(32.0, 32.0));
    }
}
