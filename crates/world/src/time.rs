//! Deterministic day/night clock.
//!
//! The host keeps time as a tick counter within the current phase plus a day/night
//! flag. Day lasts 54 000 ticks and night 32 400 ticks; the day phase begins at
//! 04:30 on the wall clock. All advancement is tick-based to keep replays
//! deterministic.

use autosleep_core::SimTick;
use serde::{Deserialize, Serialize};

/// Ticks in the day phase.
pub const DAY_LENGTH_TICKS: f64 = 54_000.0;
/// Ticks in the night phase.
pub const NIGHT_LENGTH_TICKS: f64 = 32_400.0;
/// Ticks in a full day/night cycle.
pub const TICKS_PER_CYCLE: f64 = DAY_LENGTH_TICKS + NIGHT_LENGTH_TICKS;
/// Wall-clock hour at which the day phase starts.
pub const DAWN_HOUR: f64 = 4.5;

/// Host game clock.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GameClock {
    /// Ticks elapsed within the current phase.
    pub time: f64,
    /// True during the day phase.
    pub day_time: bool,
    /// Total ticks simulated since the clock was created.
    pub elapsed: SimTick,
}

impl GameClock {
    /// Clock at dawn (04:30).
    pub fn new() -> Self {
        Self {
            time: 0.0,
            day_time: true,
            elapsed: SimTick::ZERO,
        }
    }

    /// Clock set to the given wall-clock hour.
    pub fn at_hours(hours: f64) -> Self {
        let mut clock = Self::new();
        clock.set_hours(hours);
        clock
    }

    /// Advance time by one tick, flipping between day and night at phase boundaries.
    pub fn advance(&mut self) {
        self.elapsed = self.elapsed.advance(1);
        self.time += 1.0;
        if self.day_time && self.time >= DAY_LENGTH_TICKS {
            self.time = 0.0;
            self.day_time = false;
        } else if !self.day_time && self.time >= NIGHT_LENGTH_TICKS {
            self.time = 0.0;
            self.day_time = true;
        }
    }

    /// Advance by `ticks` ticks in constant time. `elapsed` saturates at `u64::MAX`.
    pub fn advance_by(&mut self, ticks: u64) {
        self.elapsed = SimTick(self.elapsed.0.saturating_add(ticks));

        let mut since_dawn = self.time;
        if !self.day_time {
            since_dawn += DAY_LENGTH_TICKS;
        }
        let since_dawn = (since_dawn + (ticks % TICKS_PER_CYCLE as u64) as f64) % TICKS_PER_CYCLE;
        self.place_since_dawn(since_dawn);
    }

    /// Current wall-clock time as fractional hours in `0.0..24.0`.
    pub fn hours(&self) -> f64 {
        let mut time = self.time;
        if !self.day_time {
            time += DAY_LENGTH_TICKS;
        }

        let mut hours = time / TICKS_PER_CYCLE * 24.0 + DAWN_HOUR;
        if hours >= 24.0 {
            hours -= 24.0;
        }
        hours
    }

    /// Move the clock to the given wall-clock hour (wrapped into `0.0..24.0`).
    ///
    /// Does not touch `elapsed`.
    pub fn set_hours(&mut self, hours: f64) {
        let since_dawn = (hours - DAWN_HOUR).rem_euclid(24.0);
        self.place_since_dawn(since_dawn / 24.0 * TICKS_PER_CYCLE);
    }

    fn place_since_dawn(&mut self, ticks: f64) {
        if ticks < DAY_LENGTH_TICKS {
            self.day_time = true;
            self.time = ticks;
        } else {
            self.day_time = false;
            self.time = ticks - DAY_LENGTH_TICKS;
        }
    }

    /// Current time formatted as `HH:MM`.
    pub fn clock_label(&self) -> String {
        let minutes = (self.hours() * 60.0).round() as u32 % 1440;
        format!("{:02}:{:02}", minutes / 60, minutes % 60)
    }
}

impl Default for GameClock {
    fn default() -> Self {
        Self::new()
    }
}
