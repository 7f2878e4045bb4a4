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

//! Interactive lecture table widget and state management.
//!
//! A navigable table over the currently projected lectures. The cursor is
//! tracked by table position but re-anchored by lecture link whenever the
//! listing is replaced, so filter and tab changes keep the cursor on the
//! same lecture where possible.

mod render;

use ratatui::widgets::TableState;

use crate::model::Lecture;

pub(crate) struct LectureTable {
    pub(crate) lectures: Vec<Lecture>,
    pub(crate) table_state: TableState,
}

impl LectureTable {
    pub(crate) fn new() -> Self {
        Self {
            lectures: vec![],
            table_state: TableState::new(),
        }
    }

    /// Replaces the listing.
    ///
    /// The cursor stays on the previously selected lecture when it is still
    /// present, and falls back to the top of the new listing otherwise.
    pub(crate) fn set_lectures(&mut self, lectures: Vec<Lecture>) {
        let selected_link = self.selected_lecture().map(|lecture| lecture.link.clone());
        self.lectures = lectures;

        let index = selected_link
            .and_then(|link| self.lectures.iter().position(|l| l.link == link))
            .or_else(|| (!self.lectures.is_empty()).then_some(0));
        self.table_state.select(index);
    }

    pub(crate) fn selected_lecture(&self) -> Option<&Lecture> {
        self.lectures.get(self.table_state.selected()?)
    }

    pub(crate) fn goto_next(&mut self) {
        if self.lectures.is_empty() {
            return;
        }
        let index = match self.table_state.selected() {
            Some(index) if index >= self.lectures.len() - 1 => 0,
            Some(index) => index + 1,
            None => 0,
        };
        self.table_state.select(Some(index));
    }

    pub(crate) fn goto_previous(&mut self) {
        if self.lectures.is_empty() {
            return;
        }
        let index = match self.table_state.selected() {
            Some(0) | None => self.lectures.len() - 1,
            Some(index) => index - 1,
        };
        self.table_state.select(Some(index));
    }

    pub(crate) fn goto_first(&mut self) {
        if !self.lectures.is_empty() {
            self.table_state.select(Some(0));
        }
    }

    pub(crate) fn goto_last(&mut self) {
        if !self.lectures.is_empty() {
            self.table_state.select(Some(self.lectures.len() - 1));
        }
    }
}
