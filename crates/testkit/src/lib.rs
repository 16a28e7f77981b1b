#![warn(missing_docs)]
//! Deterministic testing surfaces: event stream, world fixtures and tick traces.

mod fixtures;
mod trace;

use anyhow::{Context, Result};
use autosleep_core::SimTick;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

pub use fixtures::*;
pub use trace::*;

/// Primary event record captured by headless runs.
#[derive(Debug, Serialize)]
pub struct EventRecord<'a> {
    /// Simulation tick when the event occurred.
    pub tick: SimTick,
    /// Human-readable kind label.
    pub kind: &'a str,
    /// Free-form payload.
    pub payload: &'a str,
}

/// A sink that writes newline-delimited JSON to disk.
pub struct JsonlSink {
    file: BufWriter<File>,
}

impl JsonlSink {
    /// Create a new sink at `path`, creating parent dirs if needed.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = File::create(path)
            .with_context(|| format!("Failed to create event log {}", path.display()))?;
        tracing::debug!(path = %path.display(), "event log opened");
        Ok(Self {
            file: BufWriter::new(file),
        })
    }

    /// Append an event to the log.
    pub fn write(&mut self, event: &EventRecord<'_>) -> Result<()> {
        let line = serde_json::to_string(event)?;
        self.file.write_all(line.as_bytes())?;
        self.file.write_all(b"\n")?;
        Ok(())
    }

    /// Flush buffered lines to disk.
    pub fn flush(&mut self) -> Result<()> {
        self.file.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn jsonl_sink_writes_one_line_per_event() {
        let path = std::env::temp_dir().join(format!(
            "autosleep-events-{}/events.jsonl",
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        let mut sink = JsonlSink::create(&path).expect("sink create");
        sink.write(&EventRecord {
            tick: SimTick(3),
            kind: "LoopActivated",
            payload: "player#1",
        })
        .expect("write succeeds");
        sink.write(&EventRecord {
            tick: SimTick(40),
            kind: "LoopStopped",
            payload: "manual toggle",
        })
        .expect("write succeeds");
        sink.flush().expect("flush");

        let contents = fs::read_to_string(&path).expect("file readable");
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            r#"{"tick":3,"kind":"LoopActivated","payload":"player#1"}"#
        );
        assert!(lines[1].contains("manual toggle"));
    }
}
