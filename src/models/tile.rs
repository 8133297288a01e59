// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Tile identity.
//!
//! A tile is one grid cell of the explorable area, identified by its
//! column and row in the location's grid.

use std::fmt;

/// Column/row position of a tile in a location's grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileCoordinate {
    pub column: u32,
    pub row: u32,
}

impl TileCoordinate {
    /// Create a coordinate from a column and row.
    pub fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }
}

impl fmt::Display for TileCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.column, self.row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_tile_file_stem() {
        assert_eq!(TileCoordinate::new(1, 0).to_string(), "1-0");
        assert_eq!(TileCoordinate::new(12, 7).to_string(), "12-7");
    }
}
