// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric utility functions.
//!
//! This module converts between tile coordinates and the pixel positions
//! they correspond to, both on the full map and on the screenshot minimap.

use crate::models::calibration::CalibrationSettings;
use crate::models::tile::TileCoordinate;

/// Pixel offset of a tile's top-left corner on the full map, `None` if it
/// does not fit in `u32`.
pub fn tile_offset(coord: TileCoordinate, tile_width: u32, tile_height: u32) -> Option<(u32, u32)> {
    Some((
        coord.column.checked_mul(tile_width)?,
        coord.row.checked_mul(tile_height)?,
    ))
}

/// Screenshot pixel sampled to test whether the minimap highlights `coord`.
///
/// Returns `None` when the point overflows `u32`; such a point lies outside
/// any screenshot.
pub fn sample_point(coord: TileCoordinate, calibration: &CalibrationSettings) -> Option<(u32, u32)> {
    let x = coord.column.checked_mul(calibration.dx)?.checked_add(calibration.x0)?;
    let y = coord.row.checked_mul(calibration.dy)?.checked_add(calibration.y0)?;
    Some((x, y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::calibration::TileRect;
    use std::collections::HashSet;

    #[test]
    fn test_tile_offset() {
        assert_eq!(tile_offset(TileCoordinate::new(0, 0), 256, 224), Some((0, 0)));
        assert_eq!(tile_offset(TileCoordinate::new(1, 0), 256, 224), Some((256, 0)));
        assert_eq!(tile_offset(TileCoordinate::new(2, 3), 256, 224), Some((512, 672)));
    }

    #[test]
    fn test_tile_offset_overflow() {
        assert_eq!(tile_offset(TileCoordinate::new(u32::MAX, 0), 2, 2), None);
        assert_eq!(tile_offset(TileCoordinate::new(0, 1 << 31), 2, 2), None);
    }

    fn calibration() -> CalibrationSettings {
        CalibrationSettings {
            screen_width: 512,
            screen_height: 448,
            tile: TileRect { left: 0, top: 0, width: 256, height: 224 },
            num_cols: 2,
            num_rows: 2,
            x0: 10,
            y0: 10,
            dx: 20,
            dy: 20,
            colors: HashSet::from([5]),
        }
    }

    #[test]
    fn test_sample_point_uses_origin_and_stride() {
        let calibration = calibration();

        assert_eq!(sample_point(TileCoordinate::new(0, 0), &calibration), Some((10, 10)));
        assert_eq!(sample_point(TileCoordinate::new(1, 0), &calibration), Some((30, 10)));
        assert_eq!(sample_point(TileCoordinate::new(1, 1), &calibration), Some((30, 30)));
    }

    #[test]
    fn test_sample_point_overflow() {
        let mut calibration = calibration();
        calibration.x0 = u32::MAX;

        assert_eq!(sample_point(TileCoordinate::new(0, 0), &calibration), Some((u32::MAX, 10)));
        assert_eq!(sample_point(TileCoordinate::new(1, 0), &calibration), None);

        calibration.dy = u32::MAX;
        assert_eq!(sample_point(TileCoordinate::new(0, 2), &calibration), None);
    }
}
