#![warn(missing_docs)]
//! Core primitives shared across the workspace.

pub mod config;
pub mod window;

use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use config::AutoSleepConfig;
pub use window::{
    is_within_window, parse_time, TimeParseError, TimeWindow, WindowError, WindowField,
    MINUTES_PER_DAY,
};

/// Fixed tick type (60 TPS host simulation).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SimTick(pub u64);

impl SimTick {
    /// First tick in any deterministic timeline.
    pub const ZERO: Self = Self(0);

    /// Advance by `delta` ticks.
    pub fn advance(self, delta: u64) -> Self {
        Self(self.0 + delta)
    }
}

/// Stable identifier for a player session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u32);

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "player#{}", self.0)
    }
}
