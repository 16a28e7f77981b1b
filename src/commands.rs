use std::fmt;

use autosleep_core::{parse_time, AutoSleepConfig};
use autosleep_input::{parse_key_code, KeyCode};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandError {
    message: String,
}

impl CommandError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CommandError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileCoordArg {
    Absolute(i32),
    Relative(i32),
}

impl TileCoordArg {
    pub fn resolve(self, base: i32) -> i32 {
        match self {
            Self::Absolute(v) => v,
            Self::Relative(delta) => base.saturating_add(delta),
        }
    }
}

/// Boolean configuration fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFlag {
    Enabled,
    ChatMessagesEnabled,
    StopLoopOnDeath,
    StopLoopOnConfigDisabled,
    StopLoopOnInvalidSleepWindow,
    StopLoopOnLeaveBed,
    StopLoopOutsideWindow,
}

impl ConfigFlag {
    const ALL: [ConfigFlag; 7] = [
        ConfigFlag::Enabled,
        ConfigFlag::ChatMessagesEnabled,
        ConfigFlag::StopLoopOnDeath,
        ConfigFlag::StopLoopOnConfigDisabled,
        ConfigFlag::StopLoopOnInvalidSleepWindow,
        ConfigFlag::StopLoopOnLeaveBed,
        ConfigFlag::StopLoopOutsideWindow,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ConfigFlag::Enabled => "enabled",
            ConfigFlag::ChatMessagesEnabled => "chat_messages_enabled",
            ConfigFlag::StopLoopOnDeath => "stop_loop_on_death",
            ConfigFlag::StopLoopOnConfigDisabled => "stop_loop_on_config_disabled",
            ConfigFlag::StopLoopOnInvalidSleepWindow => "stop_loop_on_invalid_sleep_window",
            ConfigFlag::StopLoopOnLeaveBed => "stop_loop_on_leave_bed",
            ConfigFlag::StopLoopOutsideWindow => "stop_loop_outside_window",
        }
    }

    fn slot(self, config: &mut AutoSleepConfig) -> &mut bool {
        match self {
            ConfigFlag::Enabled => &mut config.enabled,
            ConfigFlag::ChatMessagesEnabled => &mut config.chat_messages_enabled,
            ConfigFlag::StopLoopOnDeath => &mut config.stop_loop_on_death,
            ConfigFlag::StopLoopOnConfigDisabled => &mut config.stop_loop_on_config_disabled,
            ConfigFlag::StopLoopOnInvalidSleepWindow => {
                &mut config.stop_loop_on_invalid_sleep_window
            }
            ConfigFlag::StopLoopOnLeaveBed => &mut config.stop_loop_on_leave_bed,
            ConfigFlag::StopLoopOutsideWindow => &mut config.stop_loop_outside_window,
        }
    }
}

/// A single configuration edit. Sleep times are stored verbatim so invalid windows
/// can be exercised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigChange {
    Flag { flag: ConfigFlag, value: bool },
    SleepStartTime(String),
    SleepEndTime(String),
    BedSearchRadius(i32),
    ToggleKey(String),
}

impl ConfigChange {
    pub fn apply(&self, config: &mut AutoSleepConfig) {
        match self {
            ConfigChange::Flag { flag, value } => *flag.slot(config) = *value,
            ConfigChange::SleepStartTime(value) => config.sleep_start_time = value.clone(),
            ConfigChange::SleepEndTime(value) => config.sleep_end_time = value.clone(),
            ConfigChange::BedSearchRadius(value) => config.bed_search_radius = *value,
            ConfigChange::ToggleKey(value) => config.toggle_key = value.clone(),
        }
    }

    fn describe(&self) -> String {
        match self {
            ConfigChange::Flag { flag, value } => format!("{} = {value}", flag.name()),
            ConfigChange::SleepStartTime(value) => format!("sleep_start_time = \"{value}\""),
            ConfigChange::SleepEndTime(value) => format!("sleep_end_time = \"{value}\""),
            ConfigChange::BedSearchRadius(value) => format!("bed_search_radius = {value}"),
            ConfigChange::ToggleKey(value) => format!("toggle_key = \"{value}\""),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameCommand {
    Help,
    Key { key: KeyCode },
    TimeSet { minutes: u16 },
    TimeAdd { ticks: u64 },
    Tp { x: TileCoordArg, y: TileCoordArg },
    Kill,
    Respawn,
    Wake,
    Config(ConfigChange),
    Status,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub lines: Vec<String>,
}

pub trait CommandContext {
    /// Tile the player's feet rest on.
    fn player_tile(&self) -> (i32, i32);
    fn teleport_player(&mut self, x: i32, y: i32) -> anyhow::Result<()>;

    /// Hold `key` down for the current tick.
    fn press_key(&mut self, key: KeyCode);

    fn clock_label(&self) -> String;
    fn set_clock_minutes(&mut self, minutes: u16);
    fn advance_clock(&mut self, ticks: u64);

    /// Returns false when the player was already dead.
    fn kill_player(&mut self) -> bool;
    /// Returns false when the player was alive.
    fn respawn_player(&mut self) -> bool;
    /// Returns false when the player was awake.
    fn wake_player(&mut self) -> bool;

    fn config_mut(&mut self) -> &mut AutoSleepConfig;
    fn rebind_toggle(&mut self, key_name: &str);

    fn status_lines(&self) -> Vec<String>;
}

pub fn execute_command(ctx: &mut impl CommandContext, cmd: GameCommand) -> CommandOutput {
    let mut out = CommandOutput::default();
    match cmd {
        GameCommand::Help => {
            out.lines.extend(help_lines());
        }
        GameCommand::Key { key } => {
            ctx.press_key(key);
            out.lines.push(format!("Pressed {key:?}"));
        }
        GameCommand::TimeSet { minutes } => {
            ctx.set_clock_minutes(minutes);
            out.lines.push(format!("Time set to {}", ctx.clock_label()));
        }
        GameCommand::TimeAdd { ticks } => {
            ctx.advance_clock(ticks);
            out.lines
                .push(format!("Time advanced by {ticks} ticks to {}", ctx.clock_label()));
        }
        GameCommand::Tp { x, y } => {
            let (bx, by) = ctx.player_tile();
            let x = x.resolve(bx);
            let y = y.resolve(by);
            match ctx.teleport_player(x, y) {
                Ok(()) => out.lines.push(format!("Teleported to tile {x} {y}")),
                Err(err) => out.lines.push(format!("Error: {err:#}")),
            }
        }
        GameCommand::Kill => {
            if ctx.kill_player() {
                out.lines.push("Player killed".to_string());
            } else {
                out.lines.push("Error: player is already dead".to_string());
            }
        }
        GameCommand::Respawn => {
            if ctx.respawn_player() {
                out.lines.push("Player respawned".to_string());
            } else {
                out.lines.push("Error: player is alive".to_string());
            }
        }
        GameCommand::Wake => {
            if ctx.wake_player() {
                out.lines.push("Player woke up".to_string());
            } else {
                out.lines.push("Player is not sleeping".to_string());
            }
        }
        GameCommand::Config(change) => {
            change.apply(ctx.config_mut());
            if let ConfigChange::ToggleKey(name) = &change {
                ctx.rebind_toggle(name);
            }
            out.lines.push(format!("Config {}", change.describe()));
        }
        GameCommand::Status => {
            out.lines.extend(ctx.status_lines());
        }
    }
    out
}

pub fn parse_command(input: &str) -> Result<GameCommand, CommandError> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(GameCommand::Help);
    }

    let input = input.strip_prefix('/').unwrap_or(input).trim();
    if input.is_empty() {
        return Ok(GameCommand::Help);
    }

    let mut parts = input.split_whitespace();
    let cmd = parts
        .next()
        .ok_or_else(|| CommandError::new("Missing command"))?
        .to_ascii_lowercase();
    let args: Vec<&str> = parts.collect();

    match cmd.as_str() {
        "help" | "?" => Ok(GameCommand::Help),
        "key" | "press" => {
            if args.len() != 1 {
                return Err(CommandError::new("Usage: /key <name>"));
            }
            let key = parse_key_code(args[0])
                .ok_or_else(|| CommandError::new(format!("Unknown key: {}", args[0])))?;
            Ok(GameCommand::Key { key })
        }
        "time" => parse_time_command(&args),
        "tp" | "teleport" => {
            if args.len() != 2 {
                return Err(CommandError::new("Usage: /tp <x> <y>"));
            }
            Ok(GameCommand::Tp {
                x: parse_tile_coord(args[0])?,
                y: parse_tile_coord(args[1])?,
            })
        }
        "kill" => no_args(&args, "/kill", GameCommand::Kill),
        "respawn" => no_args(&args, "/respawn", GameCommand::Respawn),
        "wake" => no_args(&args, "/wake", GameCommand::Wake),
        "status" => no_args(&args, "/status", GameCommand::Status),
        "config" => parse_config_command(&args),
        _ => Err(CommandError::new(format!(
            "Unknown command: {cmd}. Try /help"
        ))),
    }
}

fn no_args(args: &[&str], usage: &str, cmd: GameCommand) -> Result<GameCommand, CommandError> {
    if args.is_empty() {
        Ok(cmd)
    } else {
        Err(CommandError::new(format!("Usage: {usage}")))
    }
}

fn parse_tile_coord(s: &str) -> Result<TileCoordArg, CommandError> {
    let s = s.trim();
    if let Some(rest) = s.strip_prefix('~') {
        if rest.is_empty() {
            return Ok(TileCoordArg::Relative(0));
        }
        let delta = rest
            .parse::<i32>()
            .map_err(|_| CommandError::new(format!("Invalid relative tile coordinate: {s}")))?;
        return Ok(TileCoordArg::Relative(delta));
    }
    let value = s
        .parse::<i32>()
        .map_err(|_| CommandError::new(format!("Invalid tile coordinate: {s}")))?;
    Ok(TileCoordArg::Absolute(value))
}

fn parse_time_command(args: &[&str]) -> Result<GameCommand, CommandError> {
    if args.len() != 2 {
        return Err(CommandError::new("Usage: /time <set|add> <value>"));
    }
    let sub = args[0].to_ascii_lowercase();
    let value = args[1].to_ascii_lowercase();
    match sub.as_str() {
        "set" => {
            let minutes = match value.as_str() {
                "dawn" | "day" => 270,
                "noon" => 720,
                "dusk" | "night" => 1170,
                "midnight" => 0,
                _ => parse_time(&value)
                    .map_err(|err| CommandError::new(format!("Invalid time value. {err}")))?,
            };
            Ok(GameCommand::TimeSet { minutes })
        }
        "add" => {
            let ticks = value
                .parse::<u64>()
                .map_err(|_| CommandError::new("Invalid tick count"))?;
            Ok(GameCommand::TimeAdd { ticks })
        }
        _ => Err(CommandError::new("Usage: /time <set|add> <value>")),
    }
}

fn parse_config_command(args: &[&str]) -> Result<GameCommand, CommandError> {
    if args.is_empty() {
        return Err(CommandError::new("Usage: /config <field> <value>"));
    }
    let field = args[0].to_ascii_lowercase();
    // Time values may be empty on purpose; everything else takes exactly one token.
    let value = args[1..].join(" ");

    if let Some(flag) = ConfigFlag::ALL.into_iter().find(|f| f.name() == field) {
        let value = parse_bool(&value)?;
        return Ok(GameCommand::Config(ConfigChange::Flag { flag, value }));
    }

    let change = match field.as_str() {
        "sleep_start_time" => ConfigChange::SleepStartTime(unquote(&value)),
        "sleep_end_time" => ConfigChange::SleepEndTime(unquote(&value)),
        "bed_search_radius" => ConfigChange::BedSearchRadius(
            value
                .parse::<i32>()
                .map_err(|_| CommandError::new("Invalid bed search radius"))?,
        ),
        "toggle_key" => {
            if parse_key_code(&value).is_none() {
                return Err(CommandError::new(format!("Unknown key: {value}")));
            }
            ConfigChange::ToggleKey(value.trim().to_string())
        }
        _ => {
            return Err(CommandError::new(format!(
                "Unknown config field: {field}"
            )))
        }
    };
    Ok(GameCommand::Config(change))
}

fn parse_bool(value: &str) -> Result<bool, CommandError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Ok(true),
        "false" | "off" | "no" | "0" => Ok(false),
        _ => Err(CommandError::new("Expected true or false")),
    }
}

fn unquote(value: &str) -> String {
    let value = value.trim();
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
        .to_string()
}

fn help_lines() -> Vec<String> {
    vec![
        "Commands:".to_string(),
        "  /help".to_string(),
        "  /key <name>                 press a key for one tick (e.g. KeyZ, F5)".to_string(),
        "  /time set <HH:MM|hours|minutes|dawn|noon|dusk|midnight>".to_string(),
        "  /time add <ticks>".to_string(),
        "  /tp <x> <y>                 tile coordinates (supports ~offset)".to_string(),
        "  /kill".to_string(),
        "  /respawn".to_string(),
        "  /wake".to_string(),
        "  /config <field> <value>".to_string(),
        "  /status".to_string(),
    ]
}
