// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Asynchronous application command processing.
//!
//! The command worker owns everything that touches disk: the catalog
//! document and the favourites database. [`AppCommand`]s arrive from the UI
//! thread over a channel; results and failures are broadcast back to the
//! event loop as [`AppEvent`]s, so the UI never blocks on I/O.

use std::{
    path::PathBuf,
    sync::mpsc::{Receiver, Sender},
    thread,
};

use anyhow::Result;

use crate::{
    actions::events::AppEvent,
    catalog::Catalog,
    config::AppConfig,
    favourites::Favourites,
    storage::SqliteStore,
};

const DATABASE_FILE: &str = "vani.db";

#[derive(Debug)]
pub(crate) enum AppCommand {
    LoadCatalog,
    LoadFavourites,
    ToggleFavourite(String),
}

/// Spawns the background worker that executes [`AppCommand`]s.
///
/// The worker owns the favourites database connection and the authoritative
/// favourites set for the whole application lifetime. When the database
/// cannot be opened the session continues with in-memory favourites only.
pub(crate) fn spawn_command_worker(
    config: &AppConfig,
    command_rx: Receiver<AppCommand>,
    event_tx: Sender<AppEvent>,
) {
    let config = config.clone();

    thread::spawn(move || {
        let store = match SqliteStore::open(DATABASE_FILE) {
            Ok(store) => Some(store),
            Err(e) => {
                log::error!("failed to open favourites database: {:#}", e);
                let _ = event_tx.send(AppEvent::Error(
                    "Favourites will not be saved this session".to_string(),
                ));
                None
            }
        };

        let mut favourites = match &store {
            Some(store) => Favourites::load(store),
            None => Favourites::default(),
        };

        while let Ok(command) = command_rx.recv() {
            if let Err(e) = handle_command(&config, &store, &mut favourites, command, &event_tx) {
                log::error!("command worker error: {:#}", e);
                let _ = event_tx.send(AppEvent::Error(e.to_string()));
            }
        }
    });
}

/// Orchestrates the execution of a single command.
fn handle_command(
    config: &AppConfig,
    store: &Option<SqliteStore>,
    favourites: &mut Favourites,
    command: AppCommand,
    event_tx: &Sender<AppEvent>,
) -> Result<()> {
    match command {
        AppCommand::LoadCatalog => {
            let path = PathBuf::from(&config.catalog_file);
            match Catalog::load(&path) {
                Ok(catalog) => {
                    log::info!("catalog loaded: {} lectures", catalog.len());
                    event_tx.send(AppEvent::CatalogLoaded(catalog))?;
                }
                Err(e) => {
                    log::error!("catalog load failed: {:#}", e);
                    event_tx.send(AppEvent::Error(format!("Catalog unavailable: {:#}", e)))?;
                }
            }
        }

        AppCommand::LoadFavourites => {
            event_tx.send(AppEvent::FavouritesLoaded(favourites.snapshot()))?;
        }

        AppCommand::ToggleFavourite(link) => {
            favourites.toggle(&link);
            if favourites.is_favourite(&link) {
                log::debug!("favourite added: {}", link);
            } else {
                log::debug!("favourite removed: {}", link);
            }
            if let Some(store) = store {
                if let Err(e) = favourites.persist(store) {
                    // The in-memory set stays authoritative for the session.
                    log::warn!("{}", e);
                }
            }
            event_tx.send(AppEvent::FavouritesChanged(favourites.snapshot()))?;
        }
    }

    Ok(())
}
