//! Sleep loop state machine.

use crate::chat::{ChatMessage, ChatSink};
use crate::state::{SleepLoopState, ATTEMPT_INTERVAL_TICKS};
use autosleep_core::{AutoSleepConfig, PlayerId, TimeWindow, WindowError};
use autosleep_input::{InputState, KeyCode, KeybindHandle, KeybindRegistry};
use autosleep_world::{find_touching_bed, BedAnchor, GameClock, Player, TileGrid};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;
use tracing::{debug, info};

/// Name the toggle keybind is registered under.
pub const KEYBIND_NAME: &str = "Auto Sleep";

const DEFAULT_TOGGLE_KEY: KeyCode = KeyCode::KeyZ;
const NOTICE_PREFIX: &str = "AutoSleep: ";

/// Why a single sleep attempt could not start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PreconditionFailure {
    /// `enabled` is off.
    #[error("disabled in config.")]
    Disabled,
    /// The player is dead.
    #[error("cannot sleep while dead.")]
    Dead,
    /// The player is asleep already.
    #[error("already sleeping.")]
    AlreadySleeping,
    /// No bed touches the player.
    #[error("step into a bed to sleep.")]
    NoBed,
    /// The clock is outside the sleep window.
    #[error("outside sleep hours.")]
    OutsideWindow,
}

/// Why the loop was turned off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopCause {
    /// The toggle key was pressed while the loop ran.
    ManualToggle,
    /// `enabled` was switched off.
    ConfigDisabled,
    /// The player died.
    Died,
    /// The configured window no longer parses.
    InvalidWindow(WindowError),
    /// The awake player stepped away from every bed.
    LeftBed,
}

impl fmt::Display for StopCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopCause::ManualToggle => f.write_str("manual toggle"),
            StopCause::ConfigDisabled => f.write_str("disabled in config"),
            StopCause::Died => f.write_str("cannot sleep while dead"),
            StopCause::InvalidWindow(err) => write!(f, "{err}"),
            StopCause::LeftBed => f.write_str("left bed"),
        }
    }
}

/// Observable loop transition produced by a toggle or an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoopEvent {
    /// The loop turned on; `sleeping` tells whether the player lay down at once.
    Activated {
        /// Bed the loop was started from.
        bed: BedAnchor,
        /// True when the clock was inside the window.
        sleeping: bool,
    },
    /// A retry put the player to sleep.
    FellAsleep(BedAnchor),
    /// The window closed while the player slept.
    WokeOutsideWindow,
    /// The loop turned off.
    Stopped(StopCause),
}

impl LoopEvent {
    /// Short label for event logs.
    pub fn kind(&self) -> &'static str {
        match self {
            LoopEvent::Activated { .. } => "LoopActivated",
            LoopEvent::FellAsleep(_) => "FellAsleep",
            LoopEvent::WokeOutsideWindow => "WokeOutsideWindow",
            LoopEvent::Stopped(_) => "LoopStopped",
        }
    }
}

impl fmt::Display for LoopEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoopEvent::Activated { bed, sleeping } => write!(
                f,
                "activated at bed ({}, {}), sleeping={sleeping}",
                bed.x, bed.y
            ),
            LoopEvent::FellAsleep(bed) => write!(f, "fell asleep in bed ({}, {})", bed.x, bed.y),
            LoopEvent::WokeOutsideWindow => f.write_str("woke outside sleep hours"),
            LoopEvent::Stopped(cause) => write!(f, "stopped ({cause})"),
        }
    }
}

/// Everything a loop update reads from the host, plus the chat channel it writes.
pub struct SleepContext<'a> {
    /// Configuration snapshot for this tick.
    pub config: &'a AutoSleepConfig,
    /// World tiles.
    pub grid: &'a TileGrid,
    /// Day/night clock.
    pub clock: &'a GameClock,
    /// Where notices go.
    pub chat: &'a mut dyn ChatSink,
}

impl SleepContext<'_> {
    fn notify(&mut self, text: impl fmt::Display) {
        let text = format!("{NOTICE_PREFIX}{text}");
        debug!(notice = %text, "auto-sleep notice");
        if self.config.chat_messages_enabled {
            self.chat.post(ChatMessage::notice(text));
        }
    }

    fn touching_bed(&self, player: &Player) -> Option<BedAnchor> {
        find_touching_bed(self.grid, player, self.config.search_radius())
    }
}

/// Owns the toggle keybind and every player's loop state.
#[derive(Debug, Default)]
pub struct SleepLoopController {
    keybind: Option<KeybindHandle>,
    loops: HashMap<PlayerId, SleepLoopState>,
}

impl SleepLoopController {
    /// Register the toggle keybind and create an empty controller.
    ///
    /// Dedicated servers have no local input, so no keybind is registered there.
    pub fn load(
        registry: &mut KeybindRegistry,
        config: &AutoSleepConfig,
        dedicated_server: bool,
    ) -> Self {
        if dedicated_server {
            debug!("dedicated server: skipping auto-sleep keybind");
            return Self::default();
        }

        let handle = registry.register(KEYBIND_NAME, DEFAULT_TOGGLE_KEY);
        registry.rebind_by_name(&handle, &config.toggle_key);
        Self {
            keybind: Some(handle),
            loops: HashMap::new(),
        }
    }

    /// Release the keybind and forget every player's state.
    pub fn unload(&mut self, registry: &mut KeybindRegistry) {
        if let Some(handle) = self.keybind.take() {
            registry.unregister(handle);
        }
        self.loops.clear();
    }

    /// The registered toggle keybind, if any.
    pub fn keybind(&self) -> Option<&KeybindHandle> {
        self.keybind.as_ref()
    }

    /// Start tracking a player.
    pub fn session_start(&mut self, player: PlayerId) {
        self.loops.entry(player).or_default();
    }

    /// Stop tracking a player, returning its last state.
    pub fn session_end(&mut self, player: PlayerId) -> Option<SleepLoopState> {
        self.loops.remove(&player)
    }

    /// Current state for a player.
    pub fn state(&self, player: PlayerId) -> Option<&SleepLoopState> {
        self.loops.get(&player)
    }

    /// Returns true while the player's loop runs.
    pub fn is_active(&self, player: PlayerId) -> bool {
        self.state(player).is_some_and(SleepLoopState::is_active)
    }

    /// Poll the toggle keybind for `player` and toggle when it was just pressed.
    pub fn process_triggers(
        &mut self,
        player: &mut Player,
        input: &InputState,
        registry: &KeybindRegistry,
        ctx: &mut SleepContext<'_>,
    ) -> Option<LoopEvent> {
        let handle = self.keybind.as_ref()?;
        if !registry.just_pressed(handle, input) {
            return None;
        }
        self.toggle(player, ctx)
    }

    /// Toggle the loop for `player`.
    pub fn toggle(&mut self, player: &mut Player, ctx: &mut SleepContext<'_>) -> Option<LoopEvent> {
        let state = self.loops.entry(player.id).or_default();
        toggle_loop(state, player, ctx)
    }

    /// Per-tick update, run after the host has updated the player.
    pub fn post_update(
        &mut self,
        player: &mut Player,
        ctx: &mut SleepContext<'_>,
    ) -> Option<LoopEvent> {
        let state = self.loops.get_mut(&player.id)?;
        update_loop(state, player, ctx)
    }
}

fn toggle_loop(
    state: &mut SleepLoopState,
    player: &mut Player,
    ctx: &mut SleepContext<'_>,
) -> Option<LoopEvent> {
    if state.active {
        return Some(stop_loop(state, player, ctx, StopCause::ManualToggle));
    }

    if !ctx.config.enabled {
        ctx.notify(PreconditionFailure::Disabled);
        return None;
    }

    let window = match TimeWindow::from_config(ctx.config) {
        Ok(window) => window,
        Err(err) => {
            ctx.notify(err);
            return None;
        }
    };

    let Some(bed) = ctx.touching_bed(player) else {
        ctx.notify("stand in a bed to toggle.");
        return None;
    };

    state.activate();
    info!(player = player.id.0, %window, bed_x = bed.x, bed_y = bed.y, "sleep loop started");
    ctx.notify("enabled.");

    if window.contains(ctx.clock.hours()) {
        player.start_sleeping(bed);
        ctx.notify("sleeping.");
        Some(LoopEvent::Activated {
            bed,
            sleeping: true,
        })
    } else {
        ctx.notify(PreconditionFailure::OutsideWindow);
        state.notified_outside_window = true;
        Some(LoopEvent::Activated {
            bed,
            sleeping: false,
        })
    }
}

fn update_loop(
    state: &mut SleepLoopState,
    player: &mut Player,
    ctx: &mut SleepContext<'_>,
) -> Option<LoopEvent> {
    if !state.active {
        return None;
    }

    let config = ctx.config;
    let window = TimeWindow::from_config(config);
    let hour = ctx.clock.hours();
    let in_window = window.as_ref().is_ok_and(|w| w.contains(hour));
    let allow_stop = config.stop_loop_outside_window || in_window;

    if !config.enabled {
        if config.stop_loop_on_config_disabled && allow_stop {
            return Some(stop_loop(state, player, ctx, StopCause::ConfigDisabled));
        }
        return None;
    }

    if player.dead {
        if config.stop_loop_on_death && allow_stop {
            return Some(stop_loop(state, player, ctx, StopCause::Died));
        }
        if player.is_sleeping() {
            player.stop_sleeping();
        }
        return None;
    }

    let window = match window {
        Ok(window) => window,
        Err(err) => {
            if config.stop_loop_on_invalid_sleep_window && allow_stop {
                return Some(stop_loop(state, player, ctx, StopCause::InvalidWindow(err)));
            }
            if !state.notified_invalid_time {
                ctx.notify(&err);
                state.notified_invalid_time = true;
            }
            return None;
        }
    };
    state.notified_invalid_time = false;

    if config.stop_loop_on_leave_bed
        && allow_stop
        && !player.is_sleeping()
        && ctx.touching_bed(player).is_none()
    {
        return Some(stop_loop(state, player, ctx, StopCause::LeftBed));
    }

    if !in_window {
        if player.is_sleeping() {
            player.stop_sleeping();
            ctx.notify("waking (outside sleep hours).");
            return Some(LoopEvent::WokeOutsideWindow);
        }
        if !state.notified_outside_window {
            ctx.notify(PreconditionFailure::OutsideWindow);
            state.notified_outside_window = true;
        }
        return None;
    }
    state.notified_outside_window = false;

    if player.is_sleeping() {
        return None;
    }

    if state.cooldown_ticks > 0 {
        state.cooldown_ticks -= 1;
        return None;
    }

    state.cooldown_ticks = ATTEMPT_INTERVAL_TICKS;
    match try_sleep_nearest_bed(player, ctx, &window) {
        Ok(bed) => {
            ctx.notify("sleeping.");
            Some(LoopEvent::FellAsleep(bed))
        }
        Err(reason) => {
            debug!(player = player.id.0, %reason, "sleep attempt failed");
            ctx.notify(reason);
            None
        }
    }
}

fn try_sleep_nearest_bed(
    player: &mut Player,
    ctx: &SleepContext<'_>,
    window: &TimeWindow,
) -> Result<BedAnchor, PreconditionFailure> {
    if !ctx.config.enabled {
        return Err(PreconditionFailure::Disabled);
    }
    if player.dead {
        return Err(PreconditionFailure::Dead);
    }
    if player.is_sleeping() {
        return Err(PreconditionFailure::AlreadySleeping);
    }
    let bed = ctx
        .touching_bed(player)
        .ok_or(PreconditionFailure::NoBed)?;
    if !window.contains(ctx.clock.hours()) {
        return Err(PreconditionFailure::OutsideWindow);
    }

    player.start_sleeping(bed);
    Ok(bed)
}

fn stop_loop(
    state: &mut SleepLoopState,
    player: &mut Player,
    ctx: &mut SleepContext<'_>,
    cause: StopCause,
) -> LoopEvent {
    state.reset();
    if player.is_sleeping() {
        player.stop_sleeping();
    }

    info!(player = player.id.0, cause = %cause, "sleep loop stopped");
    ctx.notify(format_args!("loop stopped ({cause})."));
    LoopEvent::Stopped(cause)
}
