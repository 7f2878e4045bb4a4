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

//! Core data model.
//!
//! This module defines the central domain types: the lecture records that
//! make up the catalog, the criteria used to filter them, and the category
//! tabs that group the filtered listing by scripture.

pub(crate) mod filter;

use serde::Deserialize;

/// A single playable lecture from the archive.
///
/// The `link` is the stable identity of a lecture: favourite membership and
/// playback position lookups both key on it, never on list indices.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub(crate) struct Lecture {
    pub(crate) title: String,
    pub(crate) date: String,
    #[serde(default)]
    pub(crate) location: String,
    pub(crate) link: String,
}

impl Lecture {
    /// The four-digit year of the lecture date, when one is present.
    ///
    /// Dates are ISO-prefixed (`YYYY-MM-DD`); a record whose date does not
    /// start with four ASCII digits has no year and never matches a year
    /// criterion.
    pub(crate) fn year(&self) -> Option<&str> {
        let prefix = self.date.get(..4)?;
        prefix.bytes().all(|b| b.is_ascii_digit()).then_some(prefix)
    }
}

/// The active filter criteria.
///
/// Empty fields are inactive; active fields combine with AND.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct FilterCriteria {
    pub(crate) search: String,
    pub(crate) year: String,
    pub(crate) location: String,
}

/// Category tabs over the filtered listing.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Tab {
    All,
    BhagavadGita,
    SrimadBhagavatam,
    CaitanyaCaritamrta,
    Other,
    Favourites,
}

impl Tab {
    /// Display order, matching the `1`..`6` key bindings.
    pub(crate) const ORDER: [Tab; 6] = [
        Tab::All,
        Tab::BhagavadGita,
        Tab::SrimadBhagavatam,
        Tab::CaitanyaCaritamrta,
        Tab::Other,
        Tab::Favourites,
    ];

    pub(crate) fn title(self) -> &'static str {
        match self {
            Tab::All => "All",
            Tab::BhagavadGita => "Bhagavad-gita",
            Tab::SrimadBhagavatam => "Srimad-Bhagavatam",
            Tab::CaitanyaCaritamrta => "Caitanya-caritamrta",
            Tab::Other => "Other",
            Tab::Favourites => "Favourites",
        }
    }

    pub(crate) fn next(self) -> Tab {
        let index = Self::ORDER.iter().position(|tab| *tab == self).unwrap_or(0);
        Self::ORDER[(index + 1) % Self::ORDER.len()]
    }

    pub(crate) fn previous(self) -> Tab {
        let index = Self::ORDER.iter().position(|tab| *tab == self).unwrap_or(0);
        Self::ORDER[(index + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lecture(date: &str) -> Lecture {
        Lecture {
            title: "Bhagavad-gita 2.13".to_string(),
            date: date.to_string(),
            location: "London".to_string(),
            link: "https://archive.example/bg-2-13.mp3".to_string(),
        }
    }

    #[test]
    fn year_is_taken_from_iso_date_prefix() {
        assert_eq!(lecture("1972-03-15").year(), Some("1972"));
    }

    #[test]
    fn year_requires_four_leading_digits() {
        assert_eq!(lecture("19x2-03-15").year(), None);
        assert_eq!(lecture("March 1972").year(), None);
        assert_eq!(lecture("").year(), None);
    }

    #[test]
    fn year_handles_multibyte_dates() {
        assert_eq!(lecture("él").year(), None);
    }

    #[test]
    fn tabs_cycle_forwards_and_backwards() {
        assert_eq!(Tab::All.next(), Tab::BhagavadGita);
        assert_eq!(Tab::Favourites.next(), Tab::All);
        assert_eq!(Tab::All.previous(), Tab::Favourites);
        assert_eq!(Tab::Other.previous(), Tab::CaitanyaCaritamrta);
    }

    #[test]
    fn every_tab_returns_to_itself_after_a_full_cycle() {
        for tab in Tab::ORDER {
            let mut current = tab;
            for _ in 0..Tab::ORDER.len() {
                current = current.next();
            }
            assert_eq!(current, tab);
        }
    }
}
