// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state.
//!
//! `MapperApp` owns the mapper behind a single mutex and the background
//! folder watcher thread. Every command that touches the map goes through
//! the same lock as the watcher, so a context switch and its rebuild are
//! never interleaved with screenshot processing.

use crate::error::Result;
use crate::io::ignore_log::IgnoreLog;
use crate::io::screenshot::Screenshot;
use crate::mapper::Mapper;
use crate::models::tile::TileCoordinate;
use crate::watcher::FolderWatcher;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, Sender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::JoinHandle;
use std::time::Duration;

/// Mapper shared between command handling and the watcher.
pub type SharedMapper = Arc<Mutex<Mapper>>;

/// Lock the shared mapper, recovering the state if a holder panicked.
pub fn lock_mapper(mapper: &Mutex<Mapper>) -> MutexGuard<'_, Mapper> {
    mapper.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Settings for the background watcher.
#[derive(Debug, Clone)]
pub struct WatchSettings {
    pub folder: PathBuf,
    pub format: String,
    pub period: Duration,
    pub ignore_log: PathBuf,
}

/// Running watcher thread and the signal that stops it.
struct WatcherHandle {
    exit: Sender<()>,
    thread: JoinHandle<()>,
}

/// Command surface over the shared mapper.
pub struct MapperApp {
    mapper: SharedMapper,
    clean: Arc<AtomicBool>,
    watcher: Option<WatcherHandle>,
}

impl MapperApp {
    /// Wrap a mapper. The watcher is not started.
    pub fn new(mapper: Mapper) -> Self {
        Self {
            mapper: Arc::new(Mutex::new(mapper)),
            clean: Arc::new(AtomicBool::new(false)),
            watcher: None,
        }
    }

    /// Spawn the folder watcher thread.
    pub fn start_watcher(&mut self, settings: &WatchSettings) -> Result<()> {
        let ignores = IgnoreLog::load(&settings.ignore_log)?;
        let mut watcher = FolderWatcher::new(
            &settings.folder,
            &settings.format,
            settings.period,
            self.mapper.clone(),
            ignores,
            self.clean.clone(),
        )?;

        let (exit, receiver) = channel();
        let thread = std::thread::spawn(move || watcher.run(receiver));
        self.watcher = Some(WatcherHandle { exit, thread });
        Ok(())
    }

    #[cfg(test)]
    pub fn is_watching(&self) -> bool {
        self.watcher.is_some()
    }

    /// Change the game and/or location. Blank values are kept.
    pub fn switch(&self, game: Option<&str>, location: Option<&str>) -> Result<()> {
        lock_mapper(&self.mapper).switch(game, location)
    }

    /// Add one screenshot to the current map.
    pub fn process(&self, snap: &Screenshot) -> Result<TileCoordinate> {
        lock_mapper(&self.mapper).process(snap)
    }

    /// Path of the display file to open.
    pub fn show(&self) -> PathBuf {
        lock_mapper(&self.mapper).show().to_path_buf()
    }

    /// Clear the current map and delete its tiles.
    pub fn reset(&self) -> Result<()> {
        lock_mapper(&self.mapper).reset()
    }

    /// Ask the watcher to delete every screenshot on its next cycle.
    pub fn request_clean(&self) {
        self.clean.store(true, Ordering::SeqCst);
        log::info!("Clean requested");
    }

    #[cfg(test)]
    pub fn clean_pending(&self) -> bool {
        self.clean.load(Ordering::SeqCst)
    }

    /// Stop the watcher and wait for it to finish its current cycle.
    pub fn request_exit(&mut self) {
        if let Some(handle) = self.watcher.take() {
            let _ = handle.exit.send(());
            if handle.thread.join().is_err() {
                log::error!("Folder watcher panicked");
            }
        }
    }

    /// Current game and location.
    pub fn location(&self) -> (String, String) {
        let mapper = lock_mapper(&self.mapper);
        let context = mapper.context();
        (context.game.clone(), context.location.clone())
    }
}

impl Drop for MapperApp {
    fn drop(&mut self) {
        self.request_exit();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapper::tests::{screenshot, Fixture};
    use crate::models::context::OVERWORLD;
    use std::time::Instant;

    fn watch_settings(fixture: &Fixture) -> WatchSettings {
        let folder = fixture.dir.path().join("snaps");
        std::fs::create_dir_all(&folder).unwrap();
        WatchSettings {
            folder,
            format: r"(?P<game>[A-Za-z]+)_\d+\.png$".to_string(),
            period: Duration::from_millis(20),
            ignore_log: fixture.dir.path().join("ignores.txt"),
        }
    }

    fn wait_for(mut condition: impl FnMut() -> bool) -> bool {
        let deadline = Instant::now() + Duration::from_secs(10);
        while Instant::now() < deadline {
            if condition() {
                return true;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        false
    }

    #[test]
    fn test_commands_share_mapper() {
        let fixture = Fixture::new();
        let app = MapperApp::new(fixture.mapper(OVERWORLD));

        let snap = Screenshot::from(screenshot(TileCoordinate::new(1, 1), [3, 3, 3, 255]));
        let coord = app.process(&snap).unwrap();
        assert_eq!(coord, TileCoordinate::new(1, 1));

        app.switch(None, Some("level-1")).unwrap();
        assert_eq!(app.location(), ("ZeldaA".to_string(), "level-1".to_string()));
        assert_eq!(app.show(), fixture.display_path());

        app.reset().unwrap();
        assert!(fixture.maps_root().join("ZeldaA").join(OVERWORLD).join("1-1.png").is_file());
    }

    #[test]
    fn test_watcher_thread_processes_and_exits() {
        let fixture = Fixture::new();
        let settings = watch_settings(&fixture);
        let mut app = MapperApp::new(fixture.mapper(OVERWORLD));
        app.start_watcher(&settings).unwrap();
        assert!(app.is_watching());

        // Write elsewhere and rename so the watcher never sees a partial file
        let staged = fixture.dir.path().join("staged");
        screenshot(TileCoordinate::new(0, 1), [4, 4, 4, 255])
            .save_with_format(&staged, image::ImageFormat::Png)
            .unwrap();
        std::fs::rename(&staged, settings.folder.join("ZeldaA_1.png")).unwrap();
        let tile = fixture.maps_root().join("ZeldaA").join(OVERWORLD).join("0-1.png");
        assert!(wait_for(|| tile.is_file()));

        app.request_exit();
        assert!(!app.is_watching());
    }

    #[test]
    fn test_clean_request_is_consumed_by_watcher() {
        let fixture = Fixture::new();
        let settings = watch_settings(&fixture);
        std::fs::write(settings.folder.join("junk.txt"), "x").unwrap();
        let mut app = MapperApp::new(fixture.mapper(OVERWORLD));
        app.start_watcher(&settings).unwrap();

        app.request_clean();
        assert!(wait_for(|| !app.clean_pending()));
        assert!(!settings.folder.join("junk.txt").exists());

        app.request_exit();
    }
}
