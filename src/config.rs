use anyhow::{Context, Result};
use autosleep_core::{AutoSleepConfig, TimeWindow};
use std::{fs, path::Path};
use tracing::warn;

pub const DEFAULT_CONFIG_PATH: &str = "config/autosleep.toml";

/// Load configuration from an explicit path, falling back to defaults on errors.
pub fn load_from_path(path: &Path) -> AutoSleepConfig {
    let config = match fs::read_to_string(path) {
        Ok(contents) => match toml::from_str::<AutoSleepConfig>(&contents) {
            Ok(cfg) => cfg,
            Err(err) => {
                warn!("Failed to parse {}: {err}. Using defaults", path.display());
                AutoSleepConfig::default()
            }
        },
        Err(err) => {
            if path != Path::new(DEFAULT_CONFIG_PATH) || err.kind() != std::io::ErrorKind::NotFound
            {
                warn!("Failed to read {}: {err}. Using defaults", path.display());
            } else {
                warn!(
                    "AutoSleep config not found at {}. Using defaults",
                    path.display()
                );
            }
            AutoSleepConfig::default()
        }
    };

    // The loop re-validates every tick; this only surfaces typos early.
    if let Err(err) = TimeWindow::from_config(&config) {
        warn!("{}: {err}", path.display());
    }
    config
}

/// Save configuration as pretty TOML, creating parent directories.
pub fn save_to_path(config: &AutoSleepConfig, path: &Path) -> Result<()> {
    let toml = toml::to_string_pretty(config)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, toml).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}
