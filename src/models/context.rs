// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! The active (game, location) pair.

use super::calibration::CalibrationSettings;
use crate::io::tile_store::TILE_EXTENSION;
use std::path::{Path, PathBuf};

/// Location whose map is backfilled from the overworld.
pub const GROTTOS: &str = "grottos";

/// Location that backfills the grotto map.
pub const OVERWORLD: &str = "overworld";

/// The location currently being mapped, with its resolved paths and calibration.
#[derive(Debug, Clone)]
pub struct LocationContext {
    pub game: String,
    pub location: String,
    /// Directory holding this location's tiles
    pub tile_dir: PathBuf,
    /// Archival full-map image for this location
    pub map_path: PathBuf,
    pub calibration: CalibrationSettings,
}

impl LocationContext {
    /// Build a context rooted at `maps_root`.
    pub fn new(
        maps_root: &Path,
        game: &str,
        location: &str,
        calibration: CalibrationSettings,
    ) -> Self {
        Self {
            game: game.to_string(),
            location: location.to_string(),
            tile_dir: tile_dir(maps_root, game, location),
            map_path: maps_root
                .join(game)
                .join(format!("{location}.{TILE_EXTENSION}")),
            calibration,
        }
    }

    /// Tile directory used to backfill gaps in this location's map, if any.
    pub fn fallback_dir(&self, maps_root: &Path) -> Option<PathBuf> {
        (self.location == GROTTOS).then(|| tile_dir(maps_root, &self.game, OVERWORLD))
    }
}

/// `<maps_root>/<game>/<location>`
pub fn tile_dir(maps_root: &Path, game: &str, location: &str) -> PathBuf {
    maps_root.join(game).join(location)
}
