// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Line-oriented command shell.

use crate::app::MapperApp;
use crate::io::screenshot::Screenshot;
use std::path::PathBuf;

pub const HELP: &str = "\
Automatic tile mapper!
Take screenshots in-game and the map will automatically be updated with that
screen. Switch to mapping a dungeon using a command like \"/level-1\", or
map grottos using \"/grottos\".

Commands:
exit - quit the mapper
[game]/[loc] - change game and/or location (leave one blank to change only
               the other, e.g. \"ZeldaC/\")
show - print the path of the current map
add [file] - map one screenshot file now
clean - delete all files in the screenshot folder
reset - reset the current map
help - show this message";

/// A parsed shell command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Exit,
    Show,
    Clean,
    Reset,
    Help,
    Add(PathBuf),
    Switch { game: String, location: String },
}

impl Command {
    /// Parse one input line. Returns `None` for anything unrecognised.
    pub fn parse(line: &str) -> Option<Self> {
        if let Some(path) = line.trim().strip_prefix("add ") {
            let path = path.trim();
            return (!path.is_empty()).then(|| Command::Add(PathBuf::from(path)));
        }

        let mut words = line.split_whitespace();
        let word = words.next()?;
        if words.next().is_some() {
            return None;
        }

        match word {
            "exit" => Some(Command::Exit),
            "show" => Some(Command::Show),
            "clean" => Some(Command::Clean),
            "reset" => Some(Command::Reset),
            "help" => Some(Command::Help),
            _ => {
                let (game, location) = word.split_once('/')?;
                if location.contains('/') {
                    return None;
                }
                Some(Command::Switch {
                    game: game.to_string(),
                    location: location.to_string(),
                })
            }
        }
    }
}

/// What the shell loop should do after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Run a command against the app.
pub fn execute(app: &mut MapperApp, command: Command) -> Flow {
    match command {
        Command::Exit => {
            app.request_exit();
            return Flow::Exit;
        }
        Command::Show => println!("{}", app.show().display()),
        Command::Clean => app.request_clean(),
        Command::Reset => {
            if let Err(e) = app.reset() {
                log::error!("Failed to reset map: {}", e);
            }
        }
        Command::Help => println!("{HELP}"),
        Command::Add(path) => {
            match Screenshot::open(&path).and_then(|snap| app.process(&snap)) {
                Ok(coord) => println!("Mapped {} to tile {}", path.display(), coord),
                Err(e) => log::error!("{}: {}", path.display(), e),
            }
        }
        Command::Switch { game, location } => match app.switch(Some(&game), Some(&location)) {
            Ok(()) => {
                let (game, location) = app.location();
                println!("Now mapping {game}/{location}");
            }
            Err(e) => log::error!("Failed to switch to {}/{}: {}", game, location, e),
        },
    }
    Flow::Continue
}
