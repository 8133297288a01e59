// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Error types for mapping operations.

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while locating, storing and compositing tiles.
#[derive(Debug, Error)]
pub enum MapperError {
    #[error("Wrong screenshot size: expected {expected:?}, got {actual:?}")]
    SizeMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },

    #[error("Could not find location from screenshot")]
    LocationNotFound,

    #[error("Invalid filename {name} - must match {pattern}")]
    FilenamePatternMismatch { name: String, pattern: String },

    #[error("Missing calibration setting [{section}] {key}")]
    ConfigurationMissing { section: String, key: String },

    #[error("Invalid calibration setting [{section}] {key} = {value}")]
    InvalidConfiguration {
        section: String,
        key: String,
        value: String,
    },

    #[error("Failed to decode image {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to read palette of {}: {source}", .path.display())]
    PaletteDecode {
        path: PathBuf,
        #[source]
        source: png::DecodingError,
    },

    #[error("Failed to write image {}: {source}", .path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse settings {}: {source}", .path.display())]
    Settings {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid filename pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

impl MapperError {
    /// Wrap an I/O error with the path it occurred on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        MapperError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, MapperError>;
