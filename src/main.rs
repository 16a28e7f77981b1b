//! autosleep - headless driver for the automatic sleep loop
//!
//! Runs a small bedroom world tick by tick, feeding scripted commands to the loop
//! and printing the chat transcript.

mod command_script;
mod commands;
mod config;
mod headless;

use anyhow::{Context, Result};
use autosleep_core::parse_time;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Drive the auto-sleep loop in a headless bedroom world", long_about = None)]
struct Args {
    /// TOML configuration file
    #[arg(long, value_name = "PATH", default_value = config::DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    /// JSON command script ({"steps":[{"tick":N,"command":"..."}]})
    #[arg(long, value_name = "PATH")]
    script: Option<PathBuf>,
    /// Number of ticks to simulate (defaults to running until the script ends)
    #[arg(long)]
    ticks: Option<u64>,
    /// Wall-clock time at tick 0 (HH:MM, decimal hours, or total minutes)
    #[arg(long, value_name = "TIME", default_value = "19:00")]
    start_time: String,
    /// Write loop events, commands and chat lines as JSONL
    #[arg(long, value_name = "PATH")]
    event_log: Option<PathBuf>,
    /// Run as a dedicated server (no local keybind)
    #[arg(long)]
    dedicated: bool,
    /// Log filter, overriding RUST_LOG (e.g. "info" or "autosleep_loop=debug")
    #[arg(long, value_name = "FILTER")]
    log_level: Option<String>,
    /// Write the effective configuration to PATH and exit
    #[arg(long, value_name = "PATH")]
    write_config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // WARN by default; RUST_LOG or --log-level override.
    let filter = match args.log_level.as_deref() {
        Some(level) => tracing_subscriber::EnvFilter::try_new(level)
            .with_context(|| format!("invalid log filter {level:?}"))?,
        None => tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting autosleep v{}", env!("CARGO_PKG_VERSION"));

    let config = config::load_from_path(&args.config);
    if let Some(path) = args.write_config.as_deref() {
        config::save_to_path(&config, path)?;
        println!("Wrote {}", path.display());
        return Ok(());
    }

    let start_minutes = parse_time(&args.start_time)
        .with_context(|| format!("invalid --start-time {:?}", args.start_time))?;

    let summary = headless::run(headless::HeadlessConfig {
        config,
        command_script: args.script,
        max_ticks: args.ticks,
        start_minutes,
        event_log: args.event_log,
        dedicated: args.dedicated,
    })?;

    for line in &summary.transcript {
        println!("{line}");
    }
    println!(
        "Finished after {} ticks at {}: loop {}, player {}",
        summary.ticks,
        summary.clock,
        if summary.loop_active { "active" } else { "inactive" },
        if summary.sleeping { "sleeping" } else { "awake" },
    );
    Ok(())
}
