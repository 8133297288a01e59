// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Location context and map assembly.
//!
//! The mapper owns the active (game, location) context and the full-map
//! canvas. It turns screenshots into tiles, keeps the canvas in step with
//! the tile store, and writes the map to both the per-location archive and
//! the shared display file after every change.

use crate::error::{MapperError, Result};
use crate::io::screenshot::Screenshot;
use crate::io::settings::SettingsSource;
use crate::io::tile_store;
use crate::map::canvas::MapCanvas;
use crate::map::locator;
use crate::models::calibration::CalibrationSettings;
use crate::models::context::LocationContext;
use crate::models::tile::TileCoordinate;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Converts screenshots into tiled maps and manages the map data.
#[derive(Debug)]
pub struct Mapper {
    maps_root: PathBuf,
    display_path: PathBuf,
    settings: SettingsSource,
    context: LocationContext,
    canvas: MapCanvas,
}

impl Mapper {
    /// Create a mapper for the given game and location and build its map.
    pub fn new(
        maps_root: impl Into<PathBuf>,
        display_path: impl Into<PathBuf>,
        settings: SettingsSource,
        game: &str,
        location: &str,
    ) -> Result<Self> {
        for (key, value) in [("game", game), ("location", location)] {
            if value.is_empty() {
                return Err(MapperError::ConfigurationMissing {
                    section: "startup".to_string(),
                    key: key.to_string(),
                });
            }
        }

        let maps_root = maps_root.into();
        let context = resolve_context(&maps_root, &settings, game, location)?;
        let mut mapper = Self {
            maps_root,
            display_path: display_path.into(),
            settings,
            context,
            canvas: MapCanvas::default(),
        };
        mapper.remake()?;
        Ok(mapper)
    }

    pub fn context(&self) -> &LocationContext {
        &self.context
    }

    #[cfg(test)]
    pub fn canvas(&self) -> &MapCanvas {
        &self.canvas
    }

    /// Path of the file that always shows the current map.
    pub fn show(&self) -> &Path {
        &self.display_path
    }

    /// Change the game and/or location being mapped.
    ///
    /// `None` or an empty string keeps the current value. The new context
    /// and its map are built and saved before anything is replaced; on any
    /// error the current context and canvas stay active.
    pub fn switch(&mut self, game: Option<&str>, location: Option<&str>) -> Result<()> {
        let game = game
            .filter(|g| !g.is_empty())
            .unwrap_or(self.context.game.as_str())
            .to_string();
        let location = location
            .filter(|l| !l.is_empty())
            .unwrap_or(self.context.location.as_str())
            .to_string();

        let context = resolve_context(&self.maps_root, &self.settings, &game, &location)?;
        let canvas = build_canvas(&self.maps_root, &context)?;
        save_map(&canvas, &context, &self.display_path)?;

        self.context = context;
        self.canvas = canvas;
        log::info!("Now mapping {}/{}", game, location);
        Ok(())
    }

    /// Rebuild the canvas from the tiles on disk and save it.
    ///
    /// On error the previous canvas is kept.
    pub fn remake(&mut self) -> Result<()> {
        self.canvas = build_canvas(&self.maps_root, &self.context)?;
        self.save()
    }

    /// Locate a screenshot's tile, store it and add it to the map.
    pub fn process(&mut self, snap: &Screenshot) -> Result<TileCoordinate> {
        let calibration = &self.context.calibration;
        let coord = locator::locate(snap, calibration)?;
        let tile = locator::crop_tile(snap, calibration);

        let path = tile_store::save(coord, &tile, &self.context.tile_dir)?;
        log::info!("Saved tile {} to {}", coord, path.display());

        self.canvas.paste(coord, &tile);
        self.save()?;
        Ok(coord)
    }

    /// Clear the map and delete every saved tile for the current location.
    pub fn reset(&mut self) -> Result<()> {
        let calibration = &self.context.calibration;
        self.canvas.clear(
            calibration.num_cols,
            calibration.num_rows,
            calibration.tile.width,
            calibration.tile.height,
        )?;
        let removed = tile_store::clear_dir(&self.context.tile_dir)?;
        log::info!(
            "Reset {}/{}, removed {} files",
            self.context.game,
            self.context.location,
            removed
        );
        self.save()
    }

    /// Write the map to the location archive and the display file.
    pub fn save(&self) -> Result<()> {
        save_map(&self.canvas, &self.context, &self.display_path)
    }
}

fn blank_canvas(calibration: &CalibrationSettings) -> Result<MapCanvas> {
    MapCanvas::new(
        calibration.num_cols,
        calibration.num_rows,
        calibration.tile.width,
        calibration.tile.height,
    )
}

/// Paste every stored tile of `context` onto a fresh canvas.
///
/// Grottos are drawn over the overworld: overworld tiles fill every cell the
/// grotto has no tile of its own for.
fn build_canvas(maps_root: &Path, context: &LocationContext) -> Result<MapCanvas> {
    let mut canvas = blank_canvas(&context.calibration)?;

    let tiles = tile_store::list_tiles(&context.tile_dir)?;
    let names: HashSet<&str> = tiles.iter().map(|t| t.name.as_str()).collect();
    for tile in &tiles {
        canvas.paste(tile.coord, &tile.image);
    }

    let mut fallback_count = 0;
    if let Some(dir) = context.fallback_dir(maps_root) {
        for tile in tile_store::list_tiles(&dir)?
            .into_iter()
            .filter(|t| !names.contains(t.name.as_str()))
        {
            canvas.paste(tile.coord, &tile.image);
            fallback_count += 1;
        }
    }

    log::info!(
        "Rebuilt {}/{} from {} tiles ({} fallback)",
        context.game,
        context.location,
        tiles.len(),
        fallback_count
    );
    Ok(canvas)
}

fn save_map(canvas: &MapCanvas, context: &LocationContext, display_path: &Path) -> Result<()> {
    canvas.save(&[context.map_path.as_path(), display_path])
}

fn resolve_context(
    maps_root: &Path,
    settings: &SettingsSource,
    game: &str,
    location: &str,
) -> Result<LocationContext> {
    let tile_dir = crate::models::context::tile_dir(maps_root, game, location);
    tile_store::ensure_dir(&tile_dir)?;
    let calibration = settings.calibration(game, location)?;
    Ok(LocationContext::new(maps_root, game, location, calibration))
}
