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

//! Event routing for the search view.
//!
//! While the view is active it captures all keyboard input. Edits are
//! delegated to the managed input component and every change of the buffer
//! is broadcast so the filtered view tracks the term live.

use std::sync::mpsc::Sender;

use anyhow::Result;
use crossterm::event::{Event, KeyCode};
use tui_input::backend::crossterm::EventHandler;

use crate::{actions::events::AppEvent, components::SearchView};

impl SearchView {
    pub(crate) fn process_event(
        &mut self,
        event: &Event,
        event_tx: &Sender<AppEvent>,
    ) -> Result<()> {
        let Event::Key(key_event) = event else {
            return Ok(());
        };

        match key_event.code {
            // Both leave the input with the term still applied.
            KeyCode::Esc | KeyCode::Enter => {
                self.is_active = false;
            }

            _ => {
                let before = self.input.value().to_string();
                self.input.handle_event(event);
                if self.input.value() != before {
                    event_tx.send(AppEvent::SearchTermChanged(self.input.value().to_string()))?;
                }
            }
        }

        Ok(())
    }
}
