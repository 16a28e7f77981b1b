use anyhow::{Context, Result};
use autosleep_core::SimTick;
use serde::Deserialize;
use std::{collections::VecDeque, fs, path::Path};

#[derive(Debug, Deserialize)]
struct CommandScriptFile {
    steps: Vec<CommandScriptStepDef>,
}

#[derive(Debug, Clone, Deserialize)]
struct CommandScriptStepDef {
    tick: u64,
    command: String,
}

#[derive(Debug, Clone)]
struct CommandScriptStep {
    tick: SimTick,
    command: String,
}

/// Deterministic command script runner.
///
/// Scripts are a simple list of `{tick, command}` steps, executed in file order.
#[derive(Debug)]
pub struct CommandScriptPlayer {
    pending: VecDeque<CommandScriptStep>,
    last_tick: SimTick,
}

impl CommandScriptPlayer {
    /// Load a command script from a JSON file on disk.
    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read command script {}", path.display()))?;
        Self::from_str(&contents)
            .with_context(|| format!("Invalid command script {}", path.display()))
    }

    /// Load a command script from an in-memory JSON string.
    pub fn from_str(contents: &str) -> Result<Self> {
        let file: CommandScriptFile = serde_json::from_str(contents)?;
        if file.steps.is_empty() {
            anyhow::bail!("command script contains no steps");
        }

        let mut pending = VecDeque::with_capacity(file.steps.len());
        let mut last_tick: Option<u64> = None;
        for step in file.steps {
            let command = step.command.trim().to_string();
            if command.is_empty() {
                anyhow::bail!("command script contains an empty command");
            }

            if let Some(prev) = last_tick {
                if step.tick < prev {
                    anyhow::bail!("command script steps must be sorted by tick");
                }
            }
            last_tick = Some(step.tick);

            pending.push_back(CommandScriptStep {
                tick: SimTick(step.tick),
                command,
            });
        }

        Ok(Self {
            pending,
            last_tick: SimTick(last_tick.unwrap_or(0)),
        })
    }

    /// Drain and return all commands scheduled for ticks `<= tick`.
    pub fn drain_ready_commands(&mut self, tick: SimTick) -> Vec<String> {
        let mut commands = Vec::new();
        while self.pending.front().is_some_and(|step| step.tick <= tick) {
            if let Some(step) = self.pending.pop_front() {
                commands.push(step.command);
            }
        }
        commands
    }

    pub fn is_finished(&self) -> bool {
        self.pending.is_empty()
    }

    /// Tick of the final step.
    pub fn last_tick(&self) -> SimTick {
        self.last_tick
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_script_rejects_unsorted_ticks() {
        let json = r#"{
            "steps": [
                {"tick": 2, "command": "/time set 22:00"},
                {"tick": 1, "command": "/key KeyZ"}
            ]
        }"#;
        let err = CommandScriptPlayer::from_str(json).unwrap_err();
        assert!(
            err.to_string().contains("sorted by tick"),
            "unexpected error: {err:#}"
        );
    }

    #[test]
    fn command_script_rejects_empty_scripts_and_commands() {
        assert!(CommandScriptPlayer::from_str(r#"{"steps": []}"#).is_err());
        assert!(
            CommandScriptPlayer::from_str(r#"{"steps": [{"tick": 0, "command": "  "}]}"#).is_err()
        );
    }

    #[test]
    fn command_script_drains_in_order_and_is_deterministic() {
        let json = r#"{
            "steps": [
                {"tick": 1, "command": "/time set 22:00"},
                {"tick": 1, "command": "/key KeyZ"},
                {"tick": 3, "command": "/tp ~4 ~"}
            ]
        }"#;
        let mut script = CommandScriptPlayer::from_str(json).expect("script should parse");
        assert_eq!(script.last_tick(), SimTick(3));

        assert_eq!(
            script.drain_ready_commands(SimTick(0)),
            Vec::<String>::new()
        );
        assert_eq!(
            script.drain_ready_commands(SimTick(1)),
            vec!["/time set 22:00".to_string(), "/key KeyZ".to_string()]
        );
        assert_eq!(
            script.drain_ready_commands(SimTick(2)),
            Vec::<String>::new()
        );
        assert_eq!(
            script.drain_ready_commands(SimTick(3)),
            vec!["/tp ~4 ~".to_string()]
        );
        assert!(script.is_finished());
    }
}
