// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Tile locator.
//!
//! Finds which grid cell a screenshot shows by sampling the minimap at each
//! cell's reference point and checking it against the marker colors, then
//! crops the playable area out of the screenshot.

use crate::error::{MapperError, Result};
use crate::io::screenshot::Screenshot;
use crate::models::calibration::CalibrationSettings;
use crate::models::tile::TileCoordinate;
use crate::util::geometry::sample_point;
use image::{imageops, RgbaImage};

/// Check that a screenshot has exactly the calibrated screen size.
pub fn check_size(snap: &Screenshot, calibration: &CalibrationSettings) -> Result<()> {
    let actual = snap.dimensions();
    let expected = calibration.screen_size();
    if actual != expected {
        return Err(MapperError::SizeMismatch { expected, actual });
    }
    Ok(())
}

/// Determine the tile coordinate shown in a screenshot.
///
/// Columns are scanned in the outer loop and rows in the inner loop; the
/// first cell whose sample pixel is a marker color wins. Sample points
/// outside the screenshot never match.
pub fn locate(snap: &Screenshot, calibration: &CalibrationSettings) -> Result<TileCoordinate> {
    check_size(snap, calibration)?;

    for column in 0..calibration.num_cols {
        for row in 0..calibration.num_rows {
            let coord = TileCoordinate::new(column, row);
            let value = sample_point(coord, calibration).and_then(|(x, y)| snap.marker_value(x, y));
            if value.is_some_and(|value| calibration.is_marker(value)) {
                return Ok(coord);
            }
        }
    }

    Err(MapperError::LocationNotFound)
}

/// Cut the playable tile area out of a screenshot.
pub fn crop_tile(snap: &Screenshot, calibration: &CalibrationSettings) -> RgbaImage {
    let rect = calibration.tile;
    imageops::crop_imm(snap.image(), rect.left, rect.top, rect.width, rect.height).to_image()
}
