// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Durable record of screenshots that have already been handled.
//!
//! The log is a newline-delimited list of file names. Names are appended as
//! they are seen and the whole file is truncated on a clean.

use crate::error::{MapperError, Result};
use std::collections::HashSet;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

/// In-memory ignore set backed by an append-only log file.
#[derive(Debug)]
pub struct IgnoreLog {
    path: PathBuf,
    names: HashSet<String>,
}

impl IgnoreLog {
    /// Load the ignore set from `path`. A missing file is an empty set.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let names = match std::fs::read_to_string(&path) {
            Ok(contents) => contents
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect(),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashSet::new(),
            Err(e) => return Err(MapperError::io(&path, e)),
        };
        log::debug!("Loaded {} ignored names from {}", names.len(), path.display());
        Ok(Self { path, names })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Add a name to the set, appending it to the log when `persist` is true.
    pub fn insert(&mut self, name: &str, persist: bool) -> Result<()> {
        self.names.insert(name.to_string());
        if persist {
            let mut file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.path)
                .map_err(|e| MapperError::io(&self.path, e))?;
            writeln!(file, "{name}").map_err(|e| MapperError::io(&self.path, e))?;
        }
        Ok(())
    }

    /// Forget every name and truncate the log.
    pub fn clear(&mut self) -> Result<()> {
        self.names.clear();
        std::fs::File::create(&self.path).map_err(|e| MapperError::io(&self.path, e))?;
        Ok(())
    }
}
