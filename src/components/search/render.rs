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

//! UI rendering logic for the search bar.
//!
//! One line below the tab bar: the search input on the left, the active
//! year and location criteria on the right.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::{components::SearchView, model::FilterCriteria, theme::Theme};

impl SearchView {
    pub(crate) fn draw(&self, f: &mut Frame, area: Rect, criteria: &FilterCriteria, theme: &Theme) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(42)])
            .horizontal_margin(1)
            .split(area);

        let term = self.input.value();
        let search_line = if self.is_active || !term.is_empty() {
            Line::from(vec![
                Span::styled("/ ", Style::default().fg(theme.accent_colour).bold()),
                Span::raw(term),
            ])
        } else {
            Line::from("/ search   : commands").style(Style::default().fg(theme.border_colour))
        };
        f.render_widget(Paragraph::new(search_line), chunks[0]);

        let mut filters: Vec<Span> = vec![];
        if !criteria.year.is_empty() {
            filters.push(Span::styled("year ", Style::default().fg(theme.border_colour)));
            filters.push(Span::styled(
                criteria.year.clone(),
                Style::default().fg(theme.accent_colour),
            ));
        }
        if !criteria.location.is_empty() {
            if !filters.is_empty() {
                filters.push(Span::raw("  "));
            }
            filters.push(Span::styled("loc ", Style::default().fg(theme.border_colour)));
            filters.push(Span::styled(
                criteria.location.clone(),
                Style::default().fg(theme.accent_colour),
            ));
        }
        f.render_widget(
            Paragraph::new(Line::from(filters)).alignment(Alignment::Right),
            chunks[1],
        );

        if self.is_active {
            // `/ ` prefix offsets the cursor by two columns.
            let cursor_x = chunks[0].x + 2 + self.input.cursor() as u16;
            let cursor_y = chunks[0].y;
            f.set_cursor_position((cursor_x, cursor_y));
        }
    }
}
