// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Screenshot decoding.
//!
//! Marker colors are plain integers whose meaning follows the stored color
//! type of the screenshot:
//!
//! - grayscale: the luma value
//! - palette PNG: the palette index
//! - anything else: packed `0xRRGGBB`, alpha ignored
//!
//! The `image` crate expands palettes to RGB while decoding, so palette
//! indices are read separately with the `png` decoder.

use crate::error::{MapperError, Result};
use image::{DynamicImage, GenericImageView, GrayImage, ImageFormat, Luma, Rgba};
use std::io::Cursor;
use std::path::Path;

/// Packed `0xRRGGBB` value of a true-color pixel.
pub fn pixel_value(pixel: Rgba<u8>) -> u32 {
    let [r, g, b, _] = pixel.0;
    (u32::from(r) << 16) | (u32::from(g) << 8) | u32::from(b)
}

/// A decoded screenshot plus its palette indices, when it has a palette.
#[derive(Debug, Clone)]
pub struct Screenshot {
    image: DynamicImage,
    palette_indices: Option<GrayImage>,
}

impl From<DynamicImage> for Screenshot {
    fn from(image: DynamicImage) -> Self {
        Self {
            image,
            palette_indices: None,
        }
    }
}

impl Screenshot {
    /// Decode a screenshot file, keeping palette indices for indexed PNGs.
    pub fn open(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|e| MapperError::io(path, e))?;
        let decode_error = |source| MapperError::Decode {
            path: path.to_path_buf(),
            source,
        };

        let format = image::guess_format(&bytes).map_err(decode_error)?;
        let image = image::load_from_memory_with_format(&bytes, format).map_err(decode_error)?;
        let palette_indices = match format {
            ImageFormat::Png => {
                read_palette_indices(&bytes).map_err(|source| MapperError::PaletteDecode {
                    path: path.to_path_buf(),
                    source,
                })?
            }
            _ => None,
        };

        if let Some(indices) = &palette_indices {
            if indices.dimensions() != image.dimensions() {
                log::warn!(
                    "Palette of {} does not cover the image, using RGB values",
                    path.display()
                );
                return Ok(image.into());
            }
        }

        Ok(Self {
            image,
            palette_indices,
        })
    }

    /// Decoded pixels, palette already expanded.
    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    pub fn is_indexed(&self) -> bool {
        self.palette_indices.is_some()
    }

    /// Marker value of the pixel at `(x, y)`, or `None` outside the image.
    pub fn marker_value(&self, x: u32, y: u32) -> Option<u32> {
        if !self.image.in_bounds(x, y) {
            return None;
        }
        if let Some(indices) = &self.palette_indices {
            return Some(u32::from(indices.get_pixel(x, y)[0]));
        }

        let value = match &self.image {
            DynamicImage::ImageLuma8(img) => u32::from(img.get_pixel(x, y)[0]),
            DynamicImage::ImageLumaA8(img) => u32::from(img.get_pixel(x, y)[0]),
            DynamicImage::ImageLuma16(img) => u32::from(img.get_pixel(x, y)[0]),
            DynamicImage::ImageLumaA16(img) => u32::from(img.get_pixel(x, y)[0]),
            other => pixel_value(other.get_pixel(x, y)),
        };
        Some(value)
    }
}

/// Raw palette indices of an indexed PNG, `None` for other color types.
fn read_palette_indices(bytes: &[u8]) -> std::result::Result<Option<GrayImage>, png::DecodingError> {
    let mut decoder = png::Decoder::new(Cursor::new(bytes));
    decoder.set_transformations(png::Transformations::IDENTITY);
    let mut reader = decoder.read_info()?;
    if reader.info().color_type != png::ColorType::Indexed {
        return Ok(None);
    }
    let Some(size) = reader.output_buffer_size() else {
        return Ok(None);
    };

    let mut buffer = vec![0; size];
    let info = reader.next_frame(&mut buffer)?;

    // Indices below 8 bits are packed most significant first
    let bits = info.bit_depth as usize;
    let per_byte = 8 / bits;
    let mask = ((1u16 << bits) - 1) as u8;
    let indices = GrayImage::from_fn(info.width, info.height, |x, y| {
        let x = x as usize;
        let byte = buffer[y as usize * info.line_size + x / per_byte];
        let shift = 8 - bits * (x % per_byte + 1);
        Luma([(byte >> shift) & mask])
    });
    Ok(Some(indices))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use image::RgbaImage;
    use tempfile::TempDir;

    /// Palette used by indexed test images; entry `i` is `(i, 2i, 3i)`.
    fn palette(entries: usize) -> Vec<u8> {
        (0..entries)
            .map(|i| i as u8)
            .flat_map(|i| [i, i.wrapping_mul(2), i.wrapping_mul(3)])
            .collect()
    }

    /// Write an indexed PNG whose pixels are `indices` (one index per byte).
    pub(crate) fn write_indexed_png(
        path: &Path,
        width: u32,
        height: u32,
        bit_depth: png::BitDepth,
        indices: &[u8],
    ) {
        let bits = bit_depth as usize;
        let per_byte = 8 / bits;
        let line_size = (width as usize).div_ceil(per_byte);
        let mut data = vec![0u8; line_size * height as usize];
        for (i, index) in indices.iter().enumerate() {
            let (x, y) = (i % width as usize, i / width as usize);
            let shift = 8 - bits * (x % per_byte + 1);
            data[y * line_size + x / per_byte] |= index << shift;
        }

        let file = std::fs::File::create(path).unwrap();
        let mut encoder = png::Encoder::new(std::io::BufWriter::new(file), width, height);
        encoder.set_color(png::ColorType::Indexed);
        encoder.set_depth(bit_depth);
        encoder.set_palette(palette(1 << bits));
        let mut writer = encoder.write_header().unwrap();
        writer.write_image_data(&data).unwrap();
    }

    #[test]
    fn test_pixel_value_packs_rgb() {
        assert_eq!(pixel_value(Rgba([0, 0, 5, 255])), 5);
        assert_eq!(pixel_value(Rgba([0x12, 0x34, 0x56, 0])), 0x123456);
    }

    #[test]
    fn test_marker_value_true_color() {
        let mut img = RgbaImage::new(4, 4);
        img.put_pixel(1, 2, Rgba([0x01, 0x02, 0x03, 0]));
        let snap = Screenshot::from(DynamicImage::ImageRgba8(img));

        assert_eq!(snap.marker_value(1, 2), Some(0x010203));
        assert_eq!(snap.marker_value(0, 0), Some(0));
        assert_eq!(snap.marker_value(4, 0), None);
    }

    #[test]
    fn test_marker_value_grayscale_is_luma() {
        let mut img = GrayImage::new(4, 4);
        img.put_pixel(3, 1, Luma([5]));
        let snap = Screenshot::from(DynamicImage::ImageLuma8(img));

        assert_eq!(snap.marker_value(3, 1), Some(5));
        assert_eq!(snap.marker_value(0, 1), Some(0));
    }

    #[test]
    fn test_open_grayscale_png() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("gray.png");
        let mut img = GrayImage::from_pixel(3, 2, Luma([200]));
        img.put_pixel(2, 1, Luma([7]));
        img.save(&path).unwrap();

        let snap = Screenshot::open(&path).unwrap();
        assert!(!snap.is_indexed());
        assert_eq!(snap.marker_value(2, 1), Some(7));
        assert_eq!(snap.marker_value(0, 0), Some(200));
    }

    #[test]
    fn test_open_palette_png_uses_indices() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("indexed.png");
        let mut indices = vec![0u8; 12];
        indices[5] = 9;
        write_indexed_png(&path, 4, 3, png::BitDepth::Eight, &indices);

        let snap = Screenshot::open(&path).unwrap();
        assert!(snap.is_indexed());
        assert_eq!(snap.dimensions(), (4, 3));
        assert_eq!(snap.marker_value(1, 1), Some(9));
        assert_eq!(snap.marker_value(0, 0), Some(0));
        // Decoded pixels still carry the palette color
        assert_eq!(snap.image().get_pixel(1, 1), Rgba([9, 18, 27, 255]));
    }

    #[test]
    fn test_open_packed_palette_png() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("indexed4.png");
        let indices = [1, 2, 3, 4, 5, 15, 0, 14, 6, 7];
        write_indexed_png(&path, 5, 2, png::BitDepth::Four, &indices);

        let snap = Screenshot::open(&path).unwrap();
        for (i, index) in indices.iter().enumerate() {
            let (x, y) = (i as u32 % 5, i as u32 / 5);
            assert_eq!(snap.marker_value(x, y), Some(u32::from(*index)));
        }
    }

    #[test]
    fn test_open_rejects_non_image() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.png");
        std::fs::write(&path, "not an image").unwrap();

        assert!(matches!(
            Screenshot::open(&path),
            Err(MapperError::Decode { .. })
        ));
    }
}
