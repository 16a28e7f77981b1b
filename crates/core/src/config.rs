//! Auto-sleep configuration snapshot.
//!
//! The host owns persistence; this crate only describes the recognized options and
//! their defaults. A snapshot is read-only for the duration of a tick.

use serde::{Deserialize, Serialize};

/// Default bed search radius in tiles.
pub const DEFAULT_BED_SEARCH_RADIUS: i32 = 6;

/// Options recognized by the auto-sleep loop.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct AutoSleepConfig {
    /// Master switch.
    pub enabled: bool,
    /// Whether loop notices are posted to chat.
    pub chat_messages_enabled: bool,
    /// Stop the loop when the player dies.
    pub stop_loop_on_death: bool,
    /// Stop the loop when `enabled` is switched off.
    pub stop_loop_on_config_disabled: bool,
    /// Stop the loop when the configured window stops parsing.
    pub stop_loop_on_invalid_sleep_window: bool,
    /// Stop the loop when the awake player no longer touches a bed.
    pub stop_loop_on_leave_bed: bool,
    /// Let stop conditions fire even while the clock is outside the sleep window.
    pub stop_loop_outside_window: bool,
    /// Window start (`HH:MM`, decimal hours, or total minutes).
    pub sleep_start_time: String,
    /// Window end, same formats as the start.
    pub sleep_end_time: String,
    /// Half-width of the square tile neighborhood searched for beds.
    pub bed_search_radius: i32,
    /// Key name bound to the loop toggle (e.g. `KeyZ`).
    pub toggle_key: String,
}

impl Default for AutoSleepConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            chat_messages_enabled: true,
            stop_loop_on_death: true,
            stop_loop_on_config_disabled: true,
            stop_loop_on_invalid_sleep_window: true,
            stop_loop_on_leave_bed: true,
            stop_loop_outside_window: true,
            sleep_start_time: "19:30".to_string(),
            sleep_end_time: "04:30".to_string(),
            bed_search_radius: DEFAULT_BED_SEARCH_RADIUS,
            toggle_key: "KeyZ".to_string(),
        }
    }
}

impl AutoSleepConfig {
    /// Bed search radius clamped to a sane, non-negative range.
    pub fn search_radius(&self) -> i32 {
        self.bed_search_radius.clamp(0, 64)
    }
}
