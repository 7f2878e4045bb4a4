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

//! UI rendering logic for the lecture table.
//!
//! This module handles the visual representation of the lecture listing,
//! including column layout, the now-playing marker, favourite hearts, and
//! theme application using the Ratatui widget system.

use std::collections::HashSet;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Rect},
    style::{Color, Style},
    text::Line,
    widgets::{Block, Cell, Paragraph, Row, Table},
};

use crate::{
    components::LectureTable,
    render::icons::{FAVOURITE, ICON_PAUSE, ICON_PLAY},
    theme::Theme,
};

impl LectureTable {
    pub(crate) fn draw(
        &mut self,
        f: &mut Frame,
        area: Rect,
        now_playing: Option<&str>,
        is_playing: bool,
        favourites: &HashSet<String>,
        theme: &Theme,
    ) {
        if self.lectures.is_empty() {
            self.draw_empty(f, area, theme);
            return;
        }

        let rows = self.lectures.iter().map(|lecture| {
            let current = now_playing == Some(lecture.link.as_str());

            let marker = if current && is_playing {
                ICON_PLAY
            } else if current {
                ICON_PAUSE
            } else {
                ""
            };

            let title_style = if current {
                Style::default().fg(theme.accent_colour).bold()
            } else {
                Style::default().fg(theme.table_title_fg)
            };

            let heart = if favourites.contains(&lecture.link) {
                Line::from(FAVOURITE).style(Style::default().fg(theme.table_favourite_fg))
            } else {
                Line::from("")
            };

            Row::new(vec![
                Cell::from(Line::from(marker).style(Style::default().fg(theme.accent_colour))),
                Cell::from(
                    Line::from(lecture.date.as_str())
                        .style(Style::default().fg(theme.table_date_fg)),
                ),
                Cell::from(Line::from(lecture.title.as_str()).style(title_style)),
                Cell::from(
                    Line::from(lecture.location.as_str())
                        .style(Style::default().fg(theme.table_location_fg)),
                ),
                Cell::from(heart),
            ])
        });

        let table = Table::new(
            rows,
            [
                Constraint::Length(2),
                Constraint::Length(10),
                Constraint::Percentage(60),
                Constraint::Percentage(40),
                Constraint::Length(2),
            ],
        )
        .header(
            Row::new(vec![
                Cell::from(""),
                Cell::from("Date"),
                Cell::from("Title"),
                Cell::from("Location"),
                Cell::from(""),
            ])
            .style(Style::default().bold().fg(theme.accent_colour))
            .bottom_margin(1),
        )
        .row_highlight_style(Style::default().bg(Color::Blue).fg(Color::White))
        .block(Block::default());

        let state = &mut self.table_state;
        f.render_stateful_widget(table, area, state);
    }

    fn draw_empty(&self, f: &mut Frame, area: Rect, theme: &Theme) {
        let message = Paragraph::new(vec![
            Line::from(""),
            Line::from("No lectures found").style(Style::default().fg(theme.accent_colour).bold()),
            Line::from("Try adjusting your search or filters")
                .style(Style::default().fg(theme.table_date_fg)),
        ])
        .alignment(Alignment::Center);

        f.render_widget(message, area);
    }
}
