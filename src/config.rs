//! Configuration loading.
//!
//! Configuration lives in `$CONFIG_DIR/trickplay/config.toml`. Every field
//! has a default, so a missing file or a partial file is always valid.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::host::ReadyState;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Controller tuning
    pub playback: PlaybackConfig,
    /// Simulated host settings used by the CLI sessions
    pub session: SessionConfig,
}

/// Tuning for the playback controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Period of the timeline sync clock while simulating (milliseconds)
    pub tick_interval_ms: u64,
    /// Distance (seconds) within which a marker counts as reached
    pub proximity_threshold: f64,
    /// Default chapter markers are only generated above this total time (seconds)
    pub default_marker_min_duration: f64,
    /// Tolerance for reconciling seeks and offset applied at range boundaries
    pub seek_epsilon: f64,
    /// Readiness required before fast-forward, rewind, or user seeks take effect
    pub min_ready_state: ReadyState,
    /// Emit a thumbnail request alongside every simulated target-time update
    pub thumbnails_enabled: bool,
    /// Distance for a forward time skip (seconds)
    pub time_skip_forward: f64,
    /// Distance for a backward time skip (seconds)
    pub time_skip_back: f64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 250,
            proximity_threshold: 0.5,
            default_marker_min_duration: 60.0,
            seek_epsilon: 0.01,
            min_ready_state: ReadyState::CurrentData,
            thumbnails_enabled: true,
            time_skip_forward: 30.0,
            time_skip_back: 10.0,
        }
    }
}

impl PlaybackConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }
}

/// Settings for the simulated media host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// How often the simulated engine reports its position (milliseconds)
    pub position_update_interval_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            position_update_interval_ms: 200,
        }
    }
}

impl SessionConfig {
    pub fn position_update_interval(&self) -> Duration {
        Duration::from_millis(self.position_update_interval_ms.max(1))
    }
}

impl Config {
    /// Default location of the config file.
    pub fn config_path() -> Result<PathBuf> {
        let dir = dirs::config_dir().context("Could not determine config directory")?;
        Ok(dir.join("trickplay").join("config.toml"))
    }

    /// Load from the default location, falling back to defaults when absent.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load from an explicit path. The file must exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}
