use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};

/// Sensor id of the station to watch. Overridable via the config file or
/// CLI; this default is the station the project was built around.
pub const DEFAULT_SENSOR_ID: u32 = 43023;

/// Minimum spacing between actual network fetches.
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 600;

/// Timer granularity. Finer than the refresh interval so that startup and
/// post-failure retries react within seconds, while steady-state traffic
/// stays bounded by the refresh interval.
pub const DEFAULT_TICK_INTERVAL_SECS: u64 = 30;

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// PurpleAir station/sensor identifier.
    pub sensor_id: u32,

    /// Seconds between network fetches in steady state.
    pub refresh_interval_secs: u64,

    /// Seconds between freshness checks.
    pub tick_interval_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sensor_id: DEFAULT_SENSOR_ID,
            refresh_interval_secs: DEFAULT_REFRESH_INTERVAL_SECS,
            tick_interval_secs: DEFAULT_TICK_INTERVAL_SECS,
        }
    }
}

impl Config {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(self.tick_interval_secs)
    }

    /// Load config from disk, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, use the built-in station.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "aqi-indicator", "aqi")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
