// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Layered calibration settings.
//!
//! Calibration is read from YAML files of the form
//! `section -> key -> value`. The global defaults file is read first and the
//! per-game file (`<games_dir>/<game>.yaml`) overrides it key by key. Any
//! lookup that misses its section falls back to the `defaults` section.

use crate::error::{MapperError, Result};
use crate::models::calibration::{CalibrationSettings, TileRect};
use serde_yaml::Value;
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

/// Section consulted when a key is missing from the requested section.
pub const DEFAULTS_SECTION: &str = "defaults";

type Section = BTreeMap<String, Value>;

/// Merged view of one or more settings files.
#[derive(Debug, Clone, Default)]
pub struct LayeredSettings {
    sections: BTreeMap<String, Section>,
}

impl LayeredSettings {
    /// Parse a single YAML layer. Empty documents are empty layers.
    pub fn from_yaml(yaml: &str, path: &Path) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let sections: Option<BTreeMap<String, Option<Section>>> =
            serde_yaml::from_str(yaml).map_err(|source| MapperError::Settings {
                path: path.to_path_buf(),
                source,
            })?;
        let sections = sections
            .unwrap_or_default()
            .into_iter()
            .map(|(name, section)| (name, section.unwrap_or_default()))
            .collect();
        Ok(Self { sections })
    }

    /// Read a layer from disk. A missing file is an empty layer.
    pub fn read(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(yaml) => Self::from_yaml(&yaml, path),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No settings file at {}", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(MapperError::io(path, e)),
        }
    }

    /// Apply `other` on top of `self`; its keys win.
    pub fn overlay(&mut self, other: LayeredSettings) {
        for (name, section) in other.sections {
            self.sections.entry(name).or_default().extend(section);
        }
    }

    fn get(&self, section: &str, key: &str) -> Option<&Value> {
        self.sections
            .get(section)
            .and_then(|s| s.get(key))
            .or_else(|| self.sections.get(DEFAULTS_SECTION)?.get(key))
    }

    fn require(&self, section: &str, key: &str) -> Result<&Value> {
        self.get(section, key)
            .ok_or_else(|| MapperError::ConfigurationMissing {
                section: section.to_string(),
                key: key.to_string(),
            })
    }

    /// Look up a non-negative integer setting.
    pub fn get_u32(&self, section: &str, key: &str) -> Result<u32> {
        let value = self.require(section, key)?;
        value_to_u32(value).ok_or_else(|| invalid(section, key, value))
    }

    /// Look up a marker color set, given either as `"1,2,3"` or a YAML list.
    pub fn get_colors(&self, section: &str, key: &str) -> Result<HashSet<u32>> {
        let value = self.require(section, key)?;
        let colors = match value {
            Value::String(s) => s
                .split(',')
                .map(|c| c.trim().parse().ok())
                .collect::<Option<HashSet<u32>>>(),
            Value::Sequence(items) => items.iter().map(value_to_u32).collect(),
            other => value_to_u32(other).map(|c| HashSet::from([c])),
        };
        colors.ok_or_else(|| invalid(section, key, value))
    }
}

fn value_to_u32(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn invalid(section: &str, key: &str, value: &Value) -> MapperError {
    let value = serde_yaml::to_string(value)
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|_| format!("{value:?}"));
    MapperError::InvalidConfiguration {
        section: section.to_string(),
        key: key.to_string(),
        value,
    }
}

/// Where calibration files live. Assembled once at startup.
#[derive(Debug, Clone)]
pub struct SettingsSource {
    pub defaults_path: PathBuf,
    pub games_dir: PathBuf,
}

impl SettingsSource {
    pub fn new(defaults_path: impl Into<PathBuf>, games_dir: impl Into<PathBuf>) -> Self {
        Self {
            defaults_path: defaults_path.into(),
            games_dir: games_dir.into(),
        }
    }

    /// Per-game override file.
    pub fn game_path(&self, game: &str) -> PathBuf {
        self.games_dir.join(format!("{game}.yaml"))
    }

    /// Read the defaults layer with the game's overrides on top.
    pub fn load(&self, game: &str) -> Result<LayeredSettings> {
        let mut settings = LayeredSettings::read(&self.defaults_path)?;
        settings.overlay(LayeredSettings::read(&self.game_path(game))?);
        Ok(settings)
    }

    /// Resolve the calibration for a (game, location) pair.
    pub fn calibration(&self, game: &str, location: &str) -> Result<CalibrationSettings> {
        let settings = self.load(game)?;
        calibration_from(&settings, location)
    }
}

/// Build calibration from merged settings for `location`.
pub fn calibration_from(settings: &LayeredSettings, location: &str) -> Result<CalibrationSettings> {
    Ok(CalibrationSettings {
        screen_width: settings.get_u32("screen", "width")?,
        screen_height: settings.get_u32("screen", "height")?,
        tile: TileRect {
            left: settings.get_u32("tile", "left")?,
            top: settings.get_u32("tile", "top")?,
            width: settings.get_u32("tile", "width")?,
            height: settings.get_u32("tile", "height")?,
        },
        num_cols: settings.get_u32(location, "num_hori")?,
        num_rows: settings.get_u32(location, "num_vert")?,
        x0: settings.get_u32(location, "x0")?,
        y0: settings.get_u32(location, "y0")?,
        dx: settings.get_u32(location, "dx")?,
        dy: settings.get_u32(location, "dy")?,
        colors: settings.get_colors(location, "colors")?,
    })
}
