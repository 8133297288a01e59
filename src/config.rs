// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Startup configuration.
//!
//! The configuration file names the maps folder, the display file, the
//! screenshot folder and its filename format, and the context to start in.
//! It can be written in YAML or JSON.

use crate::app::WatchSettings;
use crate::io::settings::SettingsSource;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Where maps are stored and displayed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapsConfig {
    pub folder: PathBuf,
    pub display_file: PathBuf,
}

/// Context selected at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StartupConfig {
    pub game: String,
    pub location: String,
}

/// Screenshot folder settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapsConfig {
    pub folder: PathBuf,
    /// Filename pattern, optionally with a `game` named group
    pub format: String,
    #[serde(default = "default_period_ms")]
    pub period_ms: u64,
}

/// Location of the calibration files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationConfig {
    #[serde(default = "default_calibration_defaults")]
    pub defaults: PathBuf,
    #[serde(default = "default_games_dir")]
    pub games_dir: PathBuf,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            defaults: default_calibration_defaults(),
            games_dir: default_games_dir(),
        }
    }
}

/// Complete startup configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub maps: MapsConfig,
    pub startup: StartupConfig,
    pub snaps: SnapsConfig,
    #[serde(default)]
    pub calibration: CalibrationConfig,
    #[serde(default = "default_ignore_log")]
    pub ignore_log: PathBuf,
}

fn default_period_ms() -> u64 {
    1000
}

fn default_calibration_defaults() -> PathBuf {
    PathBuf::from("game-defaults.yaml")
}

fn default_games_dir() -> PathBuf {
    PathBuf::from("game-settings")
}

fn default_ignore_log() -> PathBuf {
    PathBuf::from("ignores.txt")
}

impl AppConfig {
    /// Load configuration, choosing the format from the file extension.
    pub fn load(path: &Path) -> Result<Self> {
        let extension = path.extension().and_then(|s| s.to_str());
        let config = match extension {
            Some("yaml") | Some("yml") => import_yaml(path)?,
            Some("json") => import_json(path)?,
            _ => anyhow::bail!("Unsupported config file extension: {:?}", extension),
        };
        Ok(config.expanded())
    }

    /// Expand a leading `~` in every path.
    pub fn expanded(mut self) -> Self {
        self.maps.folder = expand_home(&self.maps.folder);
        self.maps.display_file = expand_home(&self.maps.display_file);
        self.snaps.folder = expand_home(&self.snaps.folder);
        self.calibration.defaults = expand_home(&self.calibration.defaults);
        self.calibration.games_dir = expand_home(&self.calibration.games_dir);
        self.ignore_log = expand_home(&self.ignore_log);
        self
    }

    pub fn settings_source(&self) -> SettingsSource {
        SettingsSource::new(&self.calibration.defaults, &self.calibration.games_dir)
    }

    pub fn watch_settings(&self) -> WatchSettings {
        WatchSettings {
            folder: self.snaps.folder.clone(),
            format: self.snaps.format.clone(),
            period: Duration::from_millis(self.snaps.period_ms),
            ignore_log: self.ignore_log.clone(),
        }
    }
}

/// Import configuration from YAML.
pub fn import_yaml(path: &Path) -> Result<AppConfig> {
    let yaml = std::fs::read_to_string(path)
        .with_context(|| format!("Reading config {}", path.display()))?;
    let config = serde_yaml::from_str(&yaml)
        .with_context(|| format!("Parsing config {}", path.display()))?;
    Ok(config)
}

/// Import configuration from JSON.
pub fn import_json(path: &Path) -> Result<AppConfig> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Reading config {}", path.display()))?;
    let config = serde_json::from_str(&json)
        .with_context(|| format!("Parsing config {}", path.display()))?;
    Ok(config)
}

/// Replace a leading `~` with the user's home directory.
pub fn expand_home(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match dirs::home_dir() {
        Some(home) => home.join(rest),
        None => path.to_path_buf(),
    }
}
