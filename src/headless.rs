use crate::command_script::CommandScriptPlayer;
use crate::commands::{execute_command, parse_command, CommandContext};
use anyhow::{Context, Result};
use autosleep_core::{AutoSleepConfig, PlayerId, SimTick, TimeWindow};
use autosleep_input::{InputState, KeyCode, KeybindRegistry};
use autosleep_loop::{ChatLog, LoopEvent, SleepContext, SleepLoopController};
use autosleep_testkit::{bedroom, Bedroom, EventRecord, JsonlSink};
use autosleep_world::{GameClock, Player, TILE_SIZE};
use glam::Vec2;
use std::path::PathBuf;
use tracing::{debug, info, warn};

const LOCAL_PLAYER: PlayerId = PlayerId(1);

pub struct HeadlessConfig {
    pub config: AutoSleepConfig,
    pub command_script: Option<PathBuf>,
    pub max_ticks: Option<u64>,
    pub start_minutes: u16,
    pub event_log: Option<PathBuf>,
    pub dedicated: bool,
}

/// End-of-run state, logged and printed by the binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    pub ticks: u64,
    pub clock: String,
    pub loop_active: bool,
    pub sleeping: bool,
    pub loop_events: usize,
    pub transcript: Vec<String>,
}

pub fn run(cfg: HeadlessConfig) -> Result<SessionSummary> {
    let script = cfg
        .command_script
        .as_deref()
        .map(CommandScriptPlayer::from_path)
        .transpose()?;
    if script.is_none() && cfg.max_ticks.is_none() {
        anyhow::bail!("nothing to run: pass --ticks or --script");
    }

    let event_log = cfg
        .event_log
        .as_deref()
        .map(JsonlSink::create)
        .transpose()
        .context("failed to open event log")?;

    let mut session = HeadlessSession::new(cfg.config, cfg.start_minutes, cfg.dedicated, event_log);
    session.run(script, cfg.max_ticks)?;
    Ok(session.finish())
}

/// A bedroom world with one local player, driven tick by tick.
pub struct HeadlessSession {
    room: Bedroom,
    spawn: Vec2,
    player: Player,
    clock: GameClock,
    config: AutoSleepConfig,
    input: InputState,
    held_keys: Vec<KeyCode>,
    registry: KeybindRegistry,
    controller: SleepLoopController,
    chat: ChatLog,
    event_log: Option<JsonlSink>,
    tick: SimTick,
    loop_events: usize,
    transcript: Vec<String>,
}

impl HeadlessSession {
    pub fn new(
        config: AutoSleepConfig,
        start_minutes: u16,
        dedicated: bool,
        event_log: Option<JsonlSink>,
    ) -> Self {
        let room = bedroom();
        let player = room.player_in_bed(LOCAL_PLAYER);
        let mut registry = KeybindRegistry::new();
        let mut controller = SleepLoopController::load(&mut registry, &config, dedicated);
        controller.session_start(player.id);

        info!(
            player = player.id.0,
            start = %format!("{:02}:{:02}", start_minutes / 60, start_minutes % 60),
            dedicated,
            "headless session started"
        );

        Self {
            spawn: player.position,
            room,
            player,
            clock: GameClock::at_hours(f64::from(start_minutes) / 60.0),
            config,
            input: InputState::new(),
            held_keys: Vec::new(),
            registry,
            controller,
            chat: ChatLog::new(),
            event_log,
            tick: SimTick::ZERO,
            loop_events: 0,
            transcript: Vec::new(),
        }
    }

    /// Step until `max_ticks`, or until the script has run out when no limit is given.
    pub fn run(
        &mut self,
        mut script: Option<CommandScriptPlayer>,
        max_ticks: Option<u64>,
    ) -> Result<()> {
        loop {
            if max_ticks.is_some_and(|max| self.tick.0 >= max) {
                break;
            }
            if max_ticks.is_none() && script.as_ref().map_or(true, |s| self.tick > s.last_tick()) {
                break;
            }

            let commands = script
                .as_mut()
                .map(|s| s.drain_ready_commands(self.tick))
                .unwrap_or_default();
            self.step(&commands)?;
        }

        if let Some(script) = script.filter(|s| !s.is_finished()) {
            warn!(
                ticks = self.tick.0,
                last_step = script.last_tick().0,
                "tick limit reached before the command script finished"
            );
        }
        Ok(())
    }

    /// Run one tick: scripted commands, keybind triggers, loop update, clock advance.
    pub fn step(&mut self, commands: &[String]) -> Result<()> {
        let tick = self.tick;
        for key in self.held_keys.drain(..) {
            self.input.release_key(key);
        }
        self.input.begin_frame();

        for command in commands {
            self.run_command(command)?;
        }

        let mut ctx = SleepContext {
            config: &self.config,
            grid: &self.room.grid,
            clock: &self.clock,
            chat: &mut self.chat,
        };
        let toggled =
            self.controller
                .process_triggers(&mut self.player, &self.input, &self.registry, &mut ctx);
        let updated = self.controller.post_update(&mut self.player, &mut ctx);

        for event in toggled.into_iter().chain(updated) {
            self.record_loop_event(tick, &event)?;
        }
        for message in self.chat.drain() {
            self.transcript.push(format!("[{:>6}] {}", tick.0, message.text));
            write_event(&mut self.event_log, tick, "Chat", &message.text)?;
        }

        self.clock.advance();
        self.tick = tick.advance(1);
        Ok(())
    }

    fn run_command(&mut self, command: &str) -> Result<()> {
        let tick = self.tick;
        debug!(tick = tick.0, command, "running scripted command");
        let lines = match parse_command(command) {
            Ok(cmd) => execute_command(self, cmd).lines,
            Err(err) => {
                warn!(tick = tick.0, command, %err, "rejected scripted command");
                vec![format!("Error: {err}")]
            }
        };

        self.transcript.push(format!("[{:>6}] > {command}", tick.0));
        for line in lines {
            write_event(
                &mut self.event_log,
                tick,
                "Command",
                &format!("{command} -> {line}"),
            )?;
            self.transcript.push(format!("[{:>6}]   {line}", tick.0));
        }
        Ok(())
    }

    fn record_loop_event(&mut self, tick: SimTick, event: &LoopEvent) -> Result<()> {
        self.loop_events += 1;
        info!(tick = tick.0, player = self.player.id.0, kind = event.kind(), %event, "loop event");
        write_event(
            &mut self.event_log,
            tick,
            event.kind(),
            &format!("{} {event}", self.player.id),
        )
    }

    /// Release the keybind, close the player session and flush the event log.
    pub fn finish(mut self) -> SessionSummary {
        let summary = SessionSummary {
            ticks: self.tick.0,
            clock: self.clock.clock_label(),
            loop_active: self.controller.is_active(self.player.id),
            sleeping: self.player.is_sleeping(),
            loop_events: self.loop_events,
            transcript: std::mem::take(&mut self.transcript),
        };

        self.controller.session_end(self.player.id);
        self.controller.unload(&mut self.registry);
        if let Some(sink) = self.event_log.as_mut() {
            if let Err(err) = sink.flush() {
                warn!("Failed to flush event log: {err:#}");
            }
        }

        info!(
            ticks = summary.ticks,
            clock = summary.clock.as_str(),
            loop_active = summary.loop_active,
            sleeping = summary.sleeping,
            loop_events = summary.loop_events,
            "headless session finished"
        );
        summary
    }
}

fn write_event(
    sink: &mut Option<JsonlSink>,
    tick: SimTick,
    kind: &str,
    payload: &str,
) -> Result<()> {
    if let Some(sink) = sink.as_mut() {
        sink.write(&EventRecord {
            tick,
            kind,
            payload,
        })?;
    }
    Ok(())
}

impl CommandContext for HeadlessSession {
    fn player_tile(&self) -> (i32, i32) {
        let hitbox = self.player.hitbox();
        let center = self.player.center();
        (
            (center.x / TILE_SIZE as f32).floor() as i32,
            (hitbox.bottom() - 1).div_euclid(TILE_SIZE),
        )
    }

    fn teleport_player(&mut self, x: i32, y: i32) -> Result<()> {
        if !self.room.grid.in_bounds(x, y) {
            anyhow::bail!("tile ({x}, {y}) is outside the world");
        }
        self.player.stop_sleeping();
        self.player.stand_on_tile(x, y);
        Ok(())
    }

    fn press_key(&mut self, key: KeyCode) {
        self.input.press_key(key);
        self.held_keys.push(key);
    }

    fn clock_label(&self) -> String {
        self.clock.clock_label()
    }

    fn set_clock_minutes(&mut self, minutes: u16) {
        self.clock.set_hours(f64::from(minutes) / 60.0);
    }

    fn advance_clock(&mut self, ticks: u64) {
        self.clock.advance_by(ticks);
    }

    fn kill_player(&mut self) -> bool {
        if self.player.dead {
            return false;
        }
        self.player.kill();
        true
    }

    fn respawn_player(&mut self) -> bool {
        if !self.player.dead {
            return false;
        }
        self.player.respawn(self.spawn);
        true
    }

    fn wake_player(&mut self) -> bool {
        if !self.player.is_sleeping() {
            return false;
        }
        self.player.stop_sleeping();
        true
    }

    fn config_mut(&mut self) -> &mut AutoSleepConfig {
        &mut self.config
    }

    fn rebind_toggle(&mut self, key_name: &str) {
        if let Some(handle) = self.controller.keybind() {
            self.registry.rebind_by_name(handle, key_name);
        }
    }

    fn status_lines(&self) -> Vec<String> {
        let hours = self.clock.hours();
        let window = match TimeWindow::from_config(&self.config) {
            Ok(window) => {
                let side = if window.contains(hours) {
                    "inside"
                } else {
                    "outside"
                };
                let shape = if window.is_always_open() {
                    ", always open"
                } else if window.wraps_midnight() {
                    ", wraps midnight"
                } else {
                    ""
                };
                format!("{side} sleep window {window}{shape}")
            }
            Err(err) => err.to_string(),
        };

        let (x, y) = self.player_tile();
        let body = match (self.player.dead, self.player.sleeping_in()) {
            (true, _) => "dead".to_string(),
            (false, Some(bed)) => format!("sleeping in bed ({}, {})", bed.x, bed.y),
            (false, None) => "awake".to_string(),
        };

        let loop_line = match self.controller.state(self.player.id) {
            Some(state) if state.is_active() => {
                format!("Loop: active, next attempt in {} ticks", state.cooldown_ticks())
            }
            _ => "Loop: inactive".to_string(),
        };

        let binds: Vec<String> = self
            .registry
            .describe()
            .into_iter()
            .map(|(name, key)| format!("{name}={key:?}"))
            .collect();
        let key = if binds.is_empty() {
            "Keybinds: none (dedicated server)".to_string()
        } else {
            format!("Keybinds: {}", binds.join(", "))
        };

        vec![
            format!("Time {} ({window})", self.clock.clock_label()),
            format!("{} at tile {x} {y}: {body}", self.player.id),
            loop_line,
            key,
        ]
    }
}
