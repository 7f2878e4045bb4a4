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

//! User interface rendering logic.
//!
//! This module handles the translation of the [`App`] state into visual
//! widgets using the `ratatui` framework. It is responsible for layout
//! management, widget styling, and terminal frame composition.
//!
//! # Rendering Pipeline
//!
//! The primary entry point is the [`draw`] function, which is called after
//! every processed event to provide a reactive user interface. Top to
//! bottom the screen is: tab bar, search bar, lecture table, player, and
//! the commander/status line.

mod commander;
pub(crate) mod icons;
mod player;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    widgets::Tabs,
};

use crate::{
    App,
    model::Tab,
    render::{commander::draw_commander, player::draw_player},
};

/// Renders the user interface to the terminal frame.
///
/// This function calculates the layout constraints and populates the frame
/// with widgets based on the current state of the [`App`].
pub(crate) fn draw(f: &mut Frame, app: &mut App) {
    let area = f.area();

    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(7),
            Constraint::Length(1),
        ])
        .split(area);

    draw_tabs(f, outer[0], app);
    app.search_view.draw(f, outer[1], &app.criteria, &app.theme);

    let now_playing = app.controller.current().map(|lecture| lecture.link.clone());
    app.lecture_table.draw(
        f,
        outer[2],
        now_playing.as_deref(),
        app.controller.is_playing(),
        &app.favourites,
        &app.theme,
    );

    draw_player(f, outer[3], app);
    draw_commander(f, outer[4], app);
}

fn draw_tabs(f: &mut Frame, area: Rect, app: &App) {
    let titles = Tab::ORDER.iter().map(|tab| tab.title());
    let selected = Tab::ORDER
        .iter()
        .position(|tab| *tab == app.tab)
        .unwrap_or(0);

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(Style::default().fg(app.theme.border_colour))
        .highlight_style(Style::default().fg(app.theme.accent_colour).bold());

    f.render_widget(tabs, area);
}
