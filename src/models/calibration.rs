// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Per-location calibration parameters.
//!
//! Calibration describes how a screenshot of one (game, location) pair is
//! read: the expected screen size, where the playable tile sits on screen,
//! and how the minimap grid is sampled to find the current tile.

use std::collections::HashSet;

/// Rectangle of the screenshot that holds the playable tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileRect {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

/// Immutable calibration for a (game, location) pair.
///
/// Replaced wholesale whenever the location context switches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalibrationSettings {
    pub screen_width: u32,
    pub screen_height: u32,
    pub tile: TileRect,
    /// Number of grid columns (`num_hori`)
    pub num_cols: u32,
    /// Number of grid rows (`num_vert`)
    pub num_rows: u32,
    /// Minimap sample origin
    pub x0: u32,
    pub y0: u32,
    /// Minimap sample stride
    pub dx: u32,
    pub dy: u32,
    /// Marker values: luma, palette index or packed `0xRRGGBB`,
    /// depending on the screenshot's color type
    pub colors: HashSet<u32>,
}

impl CalibrationSettings {
    /// Expected screenshot dimensions (width, height).
    pub fn screen_size(&self) -> (u32, u32) {
        (self.screen_width, self.screen_height)
    }

    /// Check whether a pixel value is one of the marker colors.
    pub fn is_marker(&self, value: u32) -> bool {
        self.colors.contains(&value)
    }
}
