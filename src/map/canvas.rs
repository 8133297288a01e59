// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Full-map canvas.
//!
//! The canvas is an in-memory RGBA image sized to the whole location grid.
//! Tiles are pasted at their grid offset; the canvas is never ground truth
//! and can always be rebuilt from the tile store.

use crate::error::{MapperError, Result};
use crate::models::tile::TileCoordinate;
use crate::util::geometry::tile_offset;
use image::{imageops, RgbaImage};
use std::path::Path;

/// In-memory full map of the active location.
#[derive(Debug, Clone)]
pub struct MapCanvas {
    image: RgbaImage,
    tile_width: u32,
    tile_height: u32,
}

impl Default for MapCanvas {
    fn default() -> Self {
        Self {
            image: RgbaImage::new(0, 0),
            tile_width: 0,
            tile_height: 0,
        }
    }
}

/// Canvas side length for `count` tiles of `size` pixels.
fn side(count: u32, size: u32, key: &str) -> Result<u32> {
    count
        .checked_mul(size)
        .ok_or_else(|| MapperError::InvalidConfiguration {
            section: "tile".to_string(),
            key: key.to_string(),
            value: format!("{size} x {count} tiles overflows the map size"),
        })
}

impl MapCanvas {
    /// Create a transparent canvas for a grid of `num_cols` x `num_rows` tiles.
    pub fn new(num_cols: u32, num_rows: u32, tile_width: u32, tile_height: u32) -> Result<Self> {
        let width = side(num_cols, tile_width, "width")?;
        let height = side(num_rows, tile_height, "height")?;
        let bytes = (width as usize)
            .checked_mul(height as usize)
            .and_then(|pixels| pixels.checked_mul(4));
        if bytes.is_none() {
            return Err(MapperError::InvalidConfiguration {
                section: "tile".to_string(),
                key: "width".to_string(),
                value: format!("{width} x {height} map does not fit in memory"),
            });
        }

        Ok(Self {
            image: RgbaImage::new(width, height),
            tile_width,
            tile_height,
        })
    }

    /// Reallocate as a transparent canvas of the given grid and tile size.
    ///
    /// On error the canvas is left unchanged.
    pub fn clear(
        &mut self,
        num_cols: u32,
        num_rows: u32,
        tile_width: u32,
        tile_height: u32,
    ) -> Result<()> {
        *self = Self::new(num_cols, num_rows, tile_width, tile_height)?;
        Ok(())
    }

    /// Overwrite the region for `coord` with `tile`.
    ///
    /// A tile whose offset does not fit in `u32` is off the canvas and skipped.
    pub fn paste(&mut self, coord: TileCoordinate, tile: &RgbaImage) {
        let Some((x, y)) = tile_offset(coord, self.tile_width, self.tile_height) else {
            log::warn!("Tile {coord} is outside the map");
            return;
        };
        imageops::replace(&mut self.image, tile, i64::from(x), i64::from(y));
    }

    /// Write the canvas to every given path.
    pub fn save(&self, paths: &[&Path]) -> Result<()> {
        for path in paths {
            self.image.save(path).map_err(|source| MapperError::Image {
                path: path.to_path_buf(),
                source,
            })?;
        }
        Ok(())
    }

    #[cfg(test)]
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use tempfile::TempDir;

    #[test]
    fn test_clear_is_transparent() {
        let canvas = MapCanvas::new(2, 2, 256, 224).unwrap();

        assert_eq!(canvas.image().dimensions(), (512, 448));
        assert!(canvas.image().pixels().all(|p| p.0 == [0, 0, 0, 0]));
    }

    #[test]
    fn test_paste_at_tile_offset() {
        let mut canvas = MapCanvas::new(2, 2, 4, 3).unwrap();
        let tile = RgbaImage::from_pixel(4, 3, Rgba([9, 9, 9, 255]));

        canvas.paste(TileCoordinate::new(1, 0), &tile);

        assert_eq!(*canvas.image().get_pixel(4, 0), Rgba([9, 9, 9, 255]));
        assert_eq!(*canvas.image().get_pixel(7, 2), Rgba([9, 9, 9, 255]));
        assert_eq!(*canvas.image().get_pixel(3, 0), Rgba([0, 0, 0, 0]));
        assert_eq!(*canvas.image().get_pixel(4, 3), Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn test_paste_overwrites_without_blending() {
        let mut canvas = MapCanvas::new(1, 1, 2, 2).unwrap();
        canvas.paste(TileCoordinate::new(0, 0), &RgbaImage::from_pixel(2, 2, Rgba([200, 0, 0, 255])));
        canvas.paste(TileCoordinate::new(0, 0), &RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 0])));

        assert!(canvas.image().pixels().all(|p| p.0 == [0, 0, 0, 0]));
    }

    #[test]
    fn test_paste_far_outside_is_skipped() {
        let mut canvas = MapCanvas::new(1, 1, 2, 2).unwrap();
        let tile = RgbaImage::from_pixel(2, 2, Rgba([9, 9, 9, 255]));

        canvas.paste(TileCoordinate::new(u32::MAX, 0), &tile);
        canvas.paste(TileCoordinate::new(3, 0), &tile);

        assert!(canvas.image().pixels().all(|p| p.0 == [0, 0, 0, 0]));
    }

    #[test]
    fn test_overflowing_grid_is_rejected() {
        let mut canvas = MapCanvas::new(1, 1, 2, 2).unwrap();

        match canvas.clear(u32::MAX, 1, 2, 2) {
            Err(MapperError::InvalidConfiguration { section, key, .. }) => {
                assert_eq!(section, "tile");
                assert_eq!(key, "width");
            }
            other => panic!("expected InvalidConfiguration, got {:?}", other),
        }
        assert!(matches!(
            MapCanvas::new(1 << 15, 1 << 15, 1 << 16, 1 << 16),
            Err(MapperError::InvalidConfiguration { .. })
        ));
        assert_eq!(canvas.image().dimensions(), (2, 2));
    }

    #[test]
    fn test_save_writes_every_path() {
        let dir = TempDir::new().unwrap();
        let archive = dir.path().join("overworld.png");
        let display = dir.path().join("display.png");
        let mut canvas = MapCanvas::new(1, 1, 2, 2).unwrap();
        canvas.paste(TileCoordinate::new(0, 0), &RgbaImage::from_pixel(2, 2, Rgba([1, 2, 3, 255])));

        canvas.save(&[archive.as_path(), display.as_path()]).unwrap();

        for path in [&archive, &display] {
            let saved = image::open(path).unwrap().to_rgba8();
            assert_eq!(&saved, canvas.image());
        }
    }
}
