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

//! Command-line input logic and state management.
//!
//! This module implements a vi-style command line: `:` enters command mode,
//! the buffer is edited through a managed text input component, and on Enter
//! the parsed command is dispatched as an application event. The commander
//! never mutates application state itself.

use std::sync::mpsc::Sender;

use crossterm::event::{Event, KeyCode};
use tui_input::{Input, backend::crossterm::EventHandler};

use crate::{actions::events::AppEvent, model::Tab};

pub(crate) struct Commander {
    active: bool,
    pub(crate) input: Input,
}

impl Commander {
    pub(crate) fn new() -> Self {
        Self {
            active: false,
            input: Input::default(),
        }
    }

    pub(crate) fn active(&self) -> bool {
        self.active
    }

    /// Processes a terminal event, returning whether it was consumed.
    ///
    /// While inactive only `:` is consumed (entering command mode); while
    /// active every key event is, with Esc cancelling and Enter submitting
    /// the buffer.
    pub(crate) fn handle_event(&mut self, event: &Event, event_tx: &Sender<AppEvent>) -> bool {
        let Event::Key(key_event) = event else {
            return false;
        };

        if self.active {
            match key_event.code {
                KeyCode::Esc => {
                    self.active = false;
                }

                KeyCode::Enter => {
                    let buffer = self.input.value().trim().to_string();
                    if !buffer.is_empty() {
                        self.run_command(&buffer, event_tx);
                    }
                    self.input.reset();
                    self.active = false;
                }

                _ => {
                    // Delegate all other key events to the managed input
                    // component.
                    self.input.handle_event(event);
                }
            }
            true
        } else {
            match key_event.code {
                KeyCode::Char(':') => {
                    self.active = true;
                    true
                }
                _ => false,
            }
        }
    }

    fn run_command(&self, buffer: &str, event_tx: &Sender<AppEvent>) {
        let parts: Vec<&str> = buffer.split_whitespace().collect();

        let event = match parts.as_slice() {
            ["q"] => AppEvent::ExitApplication,

            ["p"] => AppEvent::PlayPauseRequested,
            ["pn"] => AppEvent::NextRequested,
            ["pp"] => AppEvent::PreviousRequested,
            ["rep"] => AppEvent::RepeatToggled,
            ["shuf"] => AppEvent::ShuffleRequested,

            ["v", volume] => match volume.parse::<f64>() {
                // Volume is given as a percentage, 0 to 100.
                Ok(percent) => AppEvent::VolumeRequested((percent / 100.0).clamp(0.0, 1.0)),
                Err(_) => AppEvent::Error(format!("Not a volume: {}", volume)),
            },

            ["y"] => AppEvent::YearFilterChanged(String::new()),
            ["y", year] => AppEvent::YearFilterChanged(year.to_string()),

            ["loc"] => AppEvent::LocationFilterChanged(String::new()),
            ["loc", location_parts @ ..] => {
                AppEvent::LocationFilterChanged(location_parts.join(" "))
            }

            ["clear"] => AppEvent::ClearFilters,

            ["1"] => AppEvent::TabChanged(Tab::All),
            ["2"] => AppEvent::TabChanged(Tab::BhagavadGita),
            ["3"] => AppEvent::TabChanged(Tab::SrimadBhagavatam),
            ["4"] => AppEvent::TabChanged(Tab::CaitanyaCaritamrta),
            ["5"] => AppEvent::TabChanged(Tab::Other),
            ["6"] => AppEvent::TabChanged(Tab::Favourites),

            [command, ..] => AppEvent::Error(format!("Unknown command: {}", command)),

            [] => return,
        };

        let _ = event_tx.send(event);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;

    use crossterm::event::{KeyEvent, KeyModifiers};

    use super::*;

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_command(commander: &mut Commander, tx: &Sender<AppEvent>, text: &str) {
        assert!(commander.handle_event(&key(KeyCode::Char(':')), tx));
        for c in text.chars() {
            commander.handle_event(&key(KeyCode::Char(c)), tx);
        }
        commander.handle_event(&key(KeyCode::Enter), tx);
    }

    #[test]
    fn colon_enters_command_mode_and_other_keys_pass_through() {
        let (tx, _rx) = mpsc::channel();
        let mut commander = Commander::new();

        assert!(!commander.handle_event(&key(KeyCode::Char('x')), &tx));
        assert!(commander.handle_event(&key(KeyCode::Char(':')), &tx));
        assert!(commander.active());
    }

    #[test]
    fn escape_cancels_command_mode() {
        let (tx, _rx) = mpsc::channel();
        let mut commander = Commander::new();

        commander.handle_event(&key(KeyCode::Char(':')), &tx);
        assert!(commander.handle_event(&key(KeyCode::Esc), &tx));
        assert!(!commander.active());
    }

    #[test]
    fn enter_dispatches_the_command_and_leaves_command_mode() {
        let (tx, rx) = mpsc::channel();
        let mut commander = Commander::new();

        type_command(&mut commander, &tx, "pn");

        assert!(matches!(rx.try_recv().unwrap(), AppEvent::NextRequested));
        assert!(!commander.active());
        assert_eq!(commander.input.value(), "");
    }

    #[test]
    fn volume_is_parsed_as_a_percentage() {
        let (tx, rx) = mpsc::channel();
        let mut commander = Commander::new();

        type_command(&mut commander, &tx, "v 80");

        match rx.try_recv().unwrap() {
            AppEvent::VolumeRequested(level) => assert!((level - 0.8).abs() < 1e-9),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn garbage_volume_reports_an_error() {
        let (tx, rx) = mpsc::channel();
        let mut commander = Commander::new();

        type_command(&mut commander, &tx, "v loud");

        assert!(matches!(rx.try_recv().unwrap(), AppEvent::Error(_)));
    }

    #[test]
    fn year_and_location_filters_set_and_clear() {
        let (tx, rx) = mpsc::channel();
        let mut commander = Commander::new();

        type_command(&mut commander, &tx, "y 1972");
        match rx.try_recv().unwrap() {
            AppEvent::YearFilterChanged(year) => assert_eq!(year, "1972"),
            other => panic!("unexpected event: {:?}", other),
        }

        type_command(&mut commander, &tx, "loc Los Angeles");
        match rx.try_recv().unwrap() {
            AppEvent::LocationFilterChanged(location) => assert_eq!(location, "Los Angeles"),
            other => panic!("unexpected event: {:?}", other),
        }

        type_command(&mut commander, &tx, "y");
        match rx.try_recv().unwrap() {
            AppEvent::YearFilterChanged(year) => assert_eq!(year, ""),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn unknown_commands_report_an_error() {
        let (tx, rx) = mpsc::channel();
        let mut commander = Commander::new();

        type_command(&mut commander, &tx, "frobnicate");

        match rx.try_recv().unwrap() {
            AppEvent::Error(message) => assert!(message.contains("frobnicate")),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn blank_input_dispatches_nothing() {
        let (tx, rx) = mpsc::channel();
        let mut commander = Commander::new();

        commander.handle_event(&key(KeyCode::Char(':')), &tx);
        commander.handle_event(&key(KeyCode::Enter), &tx);

        assert!(rx.try_recv().is_err());
        assert!(!commander.active());
    }
}
