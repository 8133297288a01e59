// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Snapshot folder watcher.
//!
//! The watcher polls the screenshot folder on a fixed period and feeds every
//! file it has not seen before through the mapper. Handled names are recorded
//! in the ignore log so screenshots are never processed twice, even across
//! restarts. A clean request deletes everything in the folder and forgets the
//! ignore log in a single cycle.

use crate::app::{lock_mapper, SharedMapper};
use crate::error::{MapperError, Result};
use crate::io::ignore_log::IgnoreLog;
use crate::io::screenshot::Screenshot;
use crate::models::tile::TileCoordinate;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::time::Duration;

/// Named capture group that carries the game identifier.
pub const GAME_GROUP: &str = "game";

/// Lifecycle of the watch loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatcherState {
    /// Normal polling
    Running,
    /// A clean was requested and is being carried out this cycle
    CleanPending,
    /// The exit signal was observed
    Stopped,
}

/// Polls the snapshot folder and routes new screenshots to the mapper.
pub struct FolderWatcher {
    folder: PathBuf,
    pattern: Regex,
    format: String,
    period: Duration,
    mapper: SharedMapper,
    ignores: IgnoreLog,
    clean: Arc<AtomicBool>,
    state: WatcherState,
}

impl FolderWatcher {
    /// Create a watcher for `folder`.
    ///
    /// `format` is matched from the start of each file name; a named group
    /// `game` in it selects the game the screenshot belongs to.
    pub fn new(
        folder: impl Into<PathBuf>,
        format: &str,
        period: Duration,
        mapper: SharedMapper,
        ignores: IgnoreLog,
        clean: Arc<AtomicBool>,
    ) -> Result<Self> {
        let pattern = Regex::new(&format!("^(?:{format})"))?;
        Ok(Self {
            folder: folder.into(),
            pattern,
            format: format.to_string(),
            period,
            mapper,
            ignores,
            clean,
            state: WatcherState::Running,
        })
    }

    #[cfg(test)]
    pub fn state(&self) -> WatcherState {
        self.state
    }

    #[cfg(test)]
    pub fn ignores(&self) -> &IgnoreLog {
        &self.ignores
    }

    /// Poll until the exit signal arrives or its sender is dropped.
    pub fn run(&mut self, exit: Receiver<()>) {
        log::info!(
            "Watching {} every {:?} for {} ({} already handled)",
            self.folder.display(),
            self.period,
            self.format,
            self.ignores.len()
        );
        loop {
            if let Err(e) = self.poll() {
                log::error!("Failed to scan {}: {}", self.folder.display(), e);
            }
            match exit.recv_timeout(self.period) {
                Err(RecvTimeoutError::Timeout) => {}
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        self.state = WatcherState::Stopped;
        log::info!("Stopped watching {}", self.folder.display());
    }

    /// Run a single poll cycle.
    pub fn poll(&mut self) -> Result<()> {
        let clean_now = self.clean.load(Ordering::SeqCst);
        if clean_now {
            self.state = WatcherState::CleanPending;
        }

        for (name, path) in self.snapshot()? {
            if !self.ignores.contains(&name) {
                match self.handle(&name, &path) {
                    Ok(coord) => log::info!("Mapped {} to tile {}", name, coord),
                    Err(e) => log::error!("{}: {}", name, e),
                }
                if let Err(e) = self.ignores.insert(&name, !clean_now) {
                    log::error!("Failed to record {} as handled: {}", name, e);
                }
            }
            if clean_now {
                if let Err(e) = std::fs::remove_file(&path) {
                    log::error!("Failed to delete {}: {}", path.display(), e);
                }
            }
        }

        if clean_now {
            self.ignores.clear()?;
            self.clean.store(false, Ordering::SeqCst);
            self.state = WatcherState::Running;
            log::info!("Cleaned {}", self.folder.display());
        }
        Ok(())
    }

    /// Regular files currently in the folder, sorted by name.
    fn snapshot(&self) -> Result<Vec<(String, PathBuf)>> {
        let entries =
            std::fs::read_dir(&self.folder).map_err(|e| MapperError::io(&self.folder, e))?;
        let mut files = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| MapperError::io(&self.folder, e))?.path();
            if !path.is_file() {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                files.push((name.to_string(), path.clone()));
            }
        }
        files.sort();
        Ok(files)
    }

    /// Map one screenshot while holding the mapper lock.
    fn handle(&self, name: &str, path: &Path) -> Result<TileCoordinate> {
        let caps = self.pattern.captures(name).ok_or_else(|| {
            MapperError::FilenamePatternMismatch {
                name: name.to_string(),
                pattern: self.format.clone(),
            }
        })?;
        let game = caps
            .name(GAME_GROUP)
            .map(|m| m.as_str())
            .filter(|g| !g.is_empty());

        let mut mapper = lock_mapper(&self.mapper);
        if let Some(game) = game {
            if game != mapper.context().game {
                mapper.switch(Some(game), None)?;
            }
        }
        let snap = Screenshot::open(path)?;
        if snap.is_indexed() {
            log::debug!("{} has a palette, matching markers by index", name);
        }
        mapper.process(&snap)
    }
}
