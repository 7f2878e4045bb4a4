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

//! The lecture catalog.
//!
//! The catalog is the immutable, ordered list of lectures for the session,
//! parsed once at startup from a JSON document. Catalog order is the
//! reference order everywhere else: the filtered view and the tab
//! projections preserve it, and playback sequencing follows it.
//!
//! The distinct year and location lists offered by the filter cycling keys
//! are derived from here as well.

use std::{fs, path::Path};

use anyhow::{Context, Result};

use crate::model::Lecture;

#[derive(Clone, Debug, Default)]
pub(crate) struct Catalog {
    lectures: Vec<Lecture>,
}

impl Catalog {
    /// Reads and parses the catalog document.
    ///
    /// The document is a JSON array of lecture records. Unknown fields on a
    /// record are ignored so the archive format can grow without breaking
    /// older builds.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog file {}", path.display()))?;
        let lectures: Vec<Lecture> = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse catalog file {}", path.display()))?;
        Ok(Self { lectures })
    }

    pub(crate) fn lectures(&self) -> &[Lecture] {
        &self.lectures
    }

    pub(crate) fn len(&self) -> usize {
        self.lectures.len()
    }

    /// Distinct lecture years, newest first.
    pub(crate) fn years(&self) -> Vec<String> {
        let mut years: Vec<String> = self
            .lectures
            .iter()
            .filter_map(|lecture| lecture.year())
            .map(str::to_owned)
            .collect();
        years.sort();
        years.dedup();
        years.reverse();
        years
    }

    /// Distinct lecture locations, alphabetical, skipping records with no
    /// location.
    pub(crate) fn locations(&self) -> Vec<String> {
        let mut locations: Vec<String> = self
            .lectures
            .iter()
            .filter(|lecture| !lecture.location.is_empty())
            .map(|lecture| lecture.location.clone())
            .collect();
        locations.sort();
        locations.dedup();
        locations
    }
}
