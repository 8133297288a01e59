// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Per-tile image persistence.
//!
//! Each tile lives in its location directory as `<column>-<row>.png`.
//! The file name is the only record of the tile's coordinate.

use crate::error::{MapperError, Result};
use crate::models::tile::TileCoordinate;
use image::RgbaImage;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Image extension used for tiles and full maps.
pub const TILE_EXTENSION: &str = "png";

static TILE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = format!(r"^([0-9]+)-([0-9]+)\.{TILE_EXTENSION}$");
    Regex::new(&pattern).expect("valid tile pattern")
});

/// A tile read back from disk.
#[derive(Debug, Clone)]
pub struct StoredTile {
    pub name: String,
    pub coord: TileCoordinate,
    pub image: RgbaImage,
}

/// File name for the tile at `coord`.
pub fn tile_file_name(coord: TileCoordinate) -> String {
    format!("{coord}.{TILE_EXTENSION}")
}

/// Parse a tile file name back into its coordinate.
pub fn parse_tile_name(name: &str) -> Option<TileCoordinate> {
    let caps = TILE_NAME.captures(name)?;
    let column = caps[1].parse().ok()?;
    let row = caps[2].parse().ok()?;
    Some(TileCoordinate::new(column, row))
}

/// Create `dir` and its parents if missing.
pub fn ensure_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir).map_err(|e| MapperError::io(dir, e))
}

/// Write a tile into `dir`, returning the file path.
pub fn save(coord: TileCoordinate, tile: &RgbaImage, dir: &Path) -> Result<PathBuf> {
    let path = dir.join(tile_file_name(coord));
    tile.save(&path).map_err(|source| MapperError::Image {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

/// Load one tile file.
///
/// Returns `Ok(None)` when the file name is not a tile name.
pub fn load(path: &Path) -> Result<Option<StoredTile>> {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return Ok(None);
    };
    let Some(coord) = parse_tile_name(name) else {
        return Ok(None);
    };

    let image = image::open(path)
        .map_err(|source| MapperError::Decode {
            path: path.to_path_buf(),
            source,
        })?
        .to_rgba8();

    Ok(Some(StoredTile {
        name: name.to_string(),
        coord,
        image,
    }))
}

/// Load every tile in `dir`, in directory order.
///
/// A missing directory holds no tiles. Files that are not tiles are skipped,
/// and tile files that fail to decode are skipped with a warning.
pub fn list_tiles(dir: &Path) -> Result<Vec<StoredTile>> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            log::debug!("No tile directory at {}", dir.display());
            return Ok(Vec::new());
        }
        Err(e) => return Err(MapperError::io(dir, e)),
    };

    let mut tiles = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| MapperError::io(dir, e))?.path();
        match load(&path) {
            Ok(Some(tile)) => {
                log::debug!("Loaded tile {} from {}", tile.coord, path.display());
                tiles.push(tile);
            }
            Ok(None) => {}
            Err(e) => log::warn!("Skipping tile: {}", e),
        }
    }
    Ok(tiles)
}

/// Delete every file in `dir`, returning how many were removed.
pub fn clear_dir(dir: &Path) -> Result<usize> {
    let mut removed = 0;
    for entry in std::fs::read_dir(dir).map_err(|e| MapperError::io(dir, e))? {
        let path = entry.map_err(|e| MapperError::io(dir, e))?.path();
        if path.is_file() {
            std::fs::remove_file(&path).map_err(|e| MapperError::io(&path, e))?;
            removed += 1;
        }
    }
    Ok(removed)
}
