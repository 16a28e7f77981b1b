//! Per-player loop bookkeeping.

use serde::Serialize;

/// Ticks between automatic sleep attempts while awake inside the window.
pub const ATTEMPT_INTERVAL_TICKS: u32 = 30;

/// Loop state for one player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SleepLoopState {
    pub(crate) active: bool,
    pub(crate) cooldown_ticks: u32,
    pub(crate) notified_outside_window: bool,
    pub(crate) notified_invalid_time: bool,
}

impl SleepLoopState {
    /// Returns true while the loop runs.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Ticks left before the next sleep attempt.
    pub fn cooldown_ticks(&self) -> u32 {
        self.cooldown_ticks
    }

    /// Whether the "outside sleep hours" notice was already sent.
    pub fn notified_outside_window(&self) -> bool {
        self.notified_outside_window
    }

    /// Whether the invalid-window notice was already sent.
    pub fn notified_invalid_time(&self) -> bool {
        self.notified_invalid_time
    }

    pub(crate) fn activate(&mut self) {
        self.active = true;
        self.cooldown_ticks = 0;
        self.notified_outside_window = false;
    }

    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }
}
