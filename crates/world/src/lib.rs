#![warn(missing_docs)]
//! Minimal host world model: tile grid, day/night clock, players and beds.

mod bed;
mod collision;
mod player;
mod tile;
mod time;

pub use bed::*;
pub use collision::*;
pub use player::*;
pub use tile::*;
pub use time::*;
