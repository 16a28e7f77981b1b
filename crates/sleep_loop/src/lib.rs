#![warn(missing_docs)]
//! Automatic sleep loop for players standing in a bed.
//!
//! Once toggled on, the loop keeps putting the player to sleep while the game
//! clock is inside the configured sleep window, wakes them when the window closes,
//! and retries every [`ATTEMPT_INTERVAL_TICKS`] ticks while they are awake. A set
//! of configurable stop conditions (config disabled, death, invalid window, leaving
//! the bed) turns the loop off again.

mod chat;
mod controller;
mod state;

pub use chat::{ChatLog, ChatMessage, ChatSink, NOTICE_COLOR};
pub use controller::{
    LoopEvent, PreconditionFailure, SleepContext, SleepLoopController, StopCause,
    KEYBIND_NAME,
};
pub use state::{SleepLoopState, ATTEMPT_INTERVAL_TICKS};
