// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Automatic tile mapper.
//!
//! Watches a screenshot folder, works out which map tile each screenshot
//! shows, and keeps a full map image of the current location up to date.

mod app;
mod config;
mod error;
mod io;
mod map;
mod mapper;
mod models;
mod shell;
mod util;
mod watcher;

use anyhow::{Context, Result};
use app::MapperApp;
use clap::Parser;
use config::AppConfig;
use mapper::Mapper;
use shell::{Command, Flow};
use std::io::{BufRead, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "tilemapper", about = "Build game maps from screenshots", version)]
struct Cli {
    /// Startup configuration file (YAML or JSON)
    #[arg(short, long, default_value = "settings.yaml")]
    config: PathBuf,

    /// Game to start mapping, overriding the configuration
    #[arg(short, long)]
    game: Option<String>,

    /// Location to start mapping, overriding the configuration
    #[arg(short, long)]
    location: Option<String>,
}

fn main() -> Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = AppConfig::load(&cli.config)?;
    let game = cli.game.unwrap_or_else(|| config.startup.game.clone());
    let location = cli.location.unwrap_or_else(|| config.startup.location.clone());

    let mapper = Mapper::new(
        &config.maps.folder,
        &config.maps.display_file,
        config.settings_source(),
        &game,
        &location,
    )
    .with_context(|| format!("Failed to start mapping {game}/{location}"))?;

    let mut app = MapperApp::new(mapper);
    println!("Current map: {}", app.show().display());
    app.start_watcher(&config.watch_settings())
        .context("Failed to start the folder watcher")?;

    println!("{}\n", shell::HELP);
    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!(">>> ");
        std::io::stdout().flush()?;
        let Some(line) = lines.next() else {
            app.request_exit();
            break;
        };
        match Command::parse(&line?) {
            Some(command) => {
                if shell::execute(&mut app, command) == Flow::Exit {
                    break;
                }
            }
            None => println!("{}", shell::HELP),
        }
    }

    Ok(())
}
