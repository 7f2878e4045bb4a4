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

//! Application event distribution and orchestration.
//!
//! This module defines the central event-handling logic for the
//! application, bridging the gap between user input (keyboard), background
//! worker updates (catalog, favourites, audio transport), and the UI
//! rendering pipeline.
//!
//! # Architecture
//!
//! The system follows a reactive event-loop pattern:
//!
//! 1. **Capture**: Events are received via the [`AppEvent`] enum through an
//!    asynchronous channel.
//! 2. **Process**: The [`process_events`] function updates the [`App`]
//!    state, drives the playback controller, and triggers commands to
//!    background workers.
//! 3. **Render**: After each event is processed, the UI is re-drawn using
//!    the `ratatui` terminal.
//!
//! Every state transition funnels through here; key handlers and the
//! commander only ever emit events.

use std::{collections::HashSet, io::Stdout};

use anyhow::{Result, bail};
use crossterm::event::{Event, KeyCode, KeyEvent};
use ratatui::{Terminal, prelude::CrosstermBackend};

use crate::{
    App,
    actions::commands::AppCommand,
    catalog::Catalog,
    model::{FilterCriteria, Tab},
    player::PlaybackError,
    render::draw,
};

const FINE_VOLUME_DELTA: i32 = 1;
const VOLUME_DELTA: i32 = 5;

const FINE_SEEK_DELTA: i32 = 5;
const SEEK_DELTA: i32 = 20;

#[derive(Debug)]
pub(crate) enum AppEvent {
    Key(KeyEvent),

    CatalogLoaded(Catalog),
    FavouritesLoaded(HashSet<String>),
    FavouritesChanged(HashSet<String>),

    SearchTermChanged(String),
    YearFilterChanged(String),
    LocationFilterChanged(String),
    ClearFilters,
    TabChanged(Tab),

    PlayPauseRequested,
    NextRequested,
    PreviousRequested,
    RepeatToggled,
    ShuffleRequested,
    VolumeRequested(f64),

    TransportPlaying,
    TransportPaused,
    TrackEnded,
    TransportFailed(String),
    DurationChanged(u64),
    TimeChanged(f64),
    VolumeChanged(f64),

    Tick,

    ExitApplication,

    Error(String),
    FatalError(String),
}

/// Runs the main application loop, handling events and rendering the UI in
/// the terminal.
///
/// This function loops until a 'quit' event is received or the event channel
/// is closed.
pub(crate) fn process_events(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
) -> Result<()> {
    while let Ok(event) = app.event_rx.recv() {
        match event {
            AppEvent::Key(key) => process_key_event(app, key)?,

            AppEvent::CatalogLoaded(catalog) => {
                app.catalog = catalog;
                app.refresh_view();
            }
            AppEvent::FavouritesLoaded(links) | AppEvent::FavouritesChanged(links) => {
                app.favourites = links;
                app.refresh_view();
            }

            AppEvent::SearchTermChanged(term) => {
                app.criteria.search = term;
                app.refresh_view();
            }
            AppEvent::YearFilterChanged(year) => {
                app.criteria.year = year;
                app.refresh_view();
            }
            AppEvent::LocationFilterChanged(location) => {
                app.criteria.location = location;
                app.refresh_view();
            }
            AppEvent::ClearFilters => {
                app.criteria = FilterCriteria::default();
                app.search_view.reset();
                app.refresh_view();
            }
            AppEvent::TabChanged(tab) => {
                app.tab = tab;
                app.refresh_view();
            }

            AppEvent::PlayPauseRequested => {
                let result = app.controller.toggle_play_pause(&app.filtered);
                report_playback(app, result);
            }
            AppEvent::NextRequested => {
                let result = app.controller.next(&app.filtered);
                report_playback(app, result);
            }
            AppEvent::PreviousRequested => {
                let result = app.controller.previous(&app.filtered);
                report_playback(app, result);
            }
            AppEvent::RepeatToggled => app.controller.toggle_repeat(),
            AppEvent::ShuffleRequested => {
                match app.controller.shuffle(&app.filtered) {
                    // The permutation is shown until the next view refresh;
                    // sequencing still follows the canonical filtered view.
                    Ok(shuffled) => app.lecture_table.set_lectures(shuffled),
                    Err(e) => report_playback(app, Err(e)),
                }
            }
            AppEvent::VolumeRequested(level) => {
                let result = app.controller.set_volume(level);
                report_playback(app, result);
            }

            AppEvent::TransportPlaying => app.controller.on_transport_playing(),
            AppEvent::TransportPaused => app.controller.on_transport_paused(),
            AppEvent::TrackEnded => {
                let result = app.controller.on_track_ended(&app.filtered);
                report_playback(app, result);
            }
            AppEvent::TransportFailed(reason) => {
                log::warn!("transport failure: {}", reason);
                app.controller.on_transport_error();
                app.last_error = Some(reason);
            }
            AppEvent::DurationChanged(duration) => app.player_duration = Some(duration),
            AppEvent::TimeChanged(seconds) => {
                app.player_time = Some(seconds as u64);
                if let Some(duration) = app.player_duration {
                    app.player_position = if duration > 0 {
                        Some(seconds / duration as f64)
                    } else {
                        None
                    };
                }
            }
            AppEvent::VolumeChanged(level) => app.volume = Some(level),

            AppEvent::Tick => {}

            AppEvent::ExitApplication => break,

            AppEvent::Error(message) => {
                log::warn!("{}", message);
                app.last_error = Some(message);
            }
            AppEvent::FatalError(message) => bail!(message),
        }

        // Render after every event processed
        terminal.draw(|f| draw(f, app))?;
    }

    Ok(())
}

/// Routes a controller result.
///
/// Sequencing refusals (nothing selected, nothing to play) stay silent;
/// transport refusals surface on the status line.
fn report_playback(app: &mut App, result: Result<(), PlaybackError>) {
    match result {
        Ok(()) => {}
        Err(PlaybackError::NoCurrentTrack | PlaybackError::EmptyPlaylist) => {}
        Err(PlaybackError::Transport(reason)) => {
            log::warn!("playback request failed: {}", reason);
            app.last_error = Some(reason);
        }
    }
}

/// Maps keyboard input to application actions and playback commands.
///
/// Input is routed by mode: an active search box captures everything, then
/// the commander gets a chance, and only then do the global bindings apply.
///
/// Any key press dismisses a status-line error.
fn process_key_event(app: &mut App, key: KeyEvent) -> Result<()> {
    app.last_error = None;

    let event = Event::Key(key);

    if app.search_view.is_active {
        return app.search_view.process_event(&event, &app.event_tx);
    }

    if app.commander.handle_event(&event, &app.event_tx) {
        return Ok(());
    }

    process_global_key_event(app, key)
}

fn process_global_key_event(app: &mut App, key: KeyEvent) -> Result<()> {
    match key.code {
        KeyCode::Char('q') => app.event_tx.send(AppEvent::ExitApplication)?,

        // Tabs
        KeyCode::Char('1') => app.event_tx.send(AppEvent::TabChanged(Tab::All))?,
        KeyCode::Char('2') => app.event_tx.send(AppEvent::TabChanged(Tab::BhagavadGita))?,
        KeyCode::Char('3') => app.event_tx.send(AppEvent::TabChanged(Tab::SrimadBhagavatam))?,
        KeyCode::Char('4') => app.event_tx.send(AppEvent::TabChanged(Tab::CaitanyaCaritamrta))?,
        KeyCode::Char('5') => app.event_tx.send(AppEvent::TabChanged(Tab::Other))?,
        KeyCode::Char('6') => app.event_tx.send(AppEvent::TabChanged(Tab::Favourites))?,
        KeyCode::Tab => app.event_tx.send(AppEvent::TabChanged(app.tab.next()))?,
        KeyCode::BackTab => app.event_tx.send(AppEvent::TabChanged(app.tab.previous()))?,

        // Filtering
        KeyCode::Char('/') => app.search_view.is_active = true,
        KeyCode::Char('y') => cycle_year(app),
        KeyCode::Char('l') => cycle_location(app),
        KeyCode::Char('c') => app.event_tx.send(AppEvent::ClearFilters)?,

        // Navigation
        KeyCode::Char('j') | KeyCode::Down => app.lecture_table.goto_next(),
        KeyCode::Char('k') | KeyCode::Up => app.lecture_table.goto_previous(),
        KeyCode::Char('g') => app.lecture_table.goto_first(),
        KeyCode::Char('G') => app.lecture_table.goto_last(),

        // Selection
        KeyCode::Enter => {
            if let Some(lecture) = app.lecture_table.selected_lecture().cloned() {
                let result = app.controller.play(&lecture);
                report_playback(app, result);
            }
        }
        KeyCode::Char('f') => {
            if let Some(lecture) = app.lecture_table.selected_lecture() {
                app.command_tx
                    .send(AppCommand::ToggleFavourite(lecture.link.clone()))?;
            }
        }

        // Playback controls
        KeyCode::Char(' ') => app.event_tx.send(AppEvent::PlayPauseRequested)?,
        KeyCode::Char('n') => app.event_tx.send(AppEvent::NextRequested)?,
        KeyCode::Char('p') => app.event_tx.send(AppEvent::PreviousRequested)?,
        KeyCode::Char('r') => app.event_tx.send(AppEvent::RepeatToggled)?,
        KeyCode::Char('s') => app.event_tx.send(AppEvent::ShuffleRequested)?,

        KeyCode::Char(',') => {
            let result = app.audio_player.seek(-FINE_SEEK_DELTA);
            report_playback(app, result);
        }
        KeyCode::Char('.') => {
            let result = app.audio_player.seek(FINE_SEEK_DELTA);
            report_playback(app, result);
        }
        KeyCode::Char('<') => {
            let result = app.audio_player.seek(-SEEK_DELTA);
            report_playback(app, result);
        }
        KeyCode::Char('>') => {
            let result = app.audio_player.seek(SEEK_DELTA);
            report_playback(app, result);
        }

        KeyCode::Char('-') => {
            let result = app.audio_player.adjust_volume(-FINE_VOLUME_DELTA);
            report_playback(app, result);
        }
        KeyCode::Char('=') => {
            let result = app.audio_player.adjust_volume(FINE_VOLUME_DELTA);
            report_playback(app, result);
        }
        KeyCode::Char('_') => {
            let result = app.audio_player.adjust_volume(-VOLUME_DELTA);
            report_playback(app, result);
        }
        KeyCode::Char('+') => {
            let result = app.audio_player.adjust_volume(VOLUME_DELTA);
            report_playback(app, result);
        }

        _ => {}
    }

    Ok(())
}

/// Steps the year criterion through the catalog's years, newest first,
/// returning to "no constraint" after the last.
fn cycle_year(app: &mut App) {
    let years = app.catalog.years();
    let next = next_choice(&years, &app.criteria.year);
    let _ = app.event_tx.send(AppEvent::YearFilterChanged(next));
}

/// Steps the location criterion through the catalog's locations,
/// alphabetically, returning to "no constraint" after the last.
fn cycle_location(app: &mut App) {
    let locations = app.catalog.locations();
    let next = next_choice(&locations, &app.criteria.location);
    let _ = app.event_tx.send(AppEvent::LocationFilterChanged(next));
}

/// The entry after `current` in `choices`; empty input starts at the first
/// entry, the last entry steps back to empty (no constraint).
fn next_choice(choices: &[String], current: &str) -> String {
    if current.is_empty() {
        return choices.first().cloned().unwrap_or_default();
    }
    match choices.iter().position(|choice| choice == current) {
        Some(index) if index + 1 < choices.len() => choices[index + 1].clone(),
        _ => String::new(),
    }
}
