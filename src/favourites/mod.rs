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

//! Favourite lectures and their persistence.
//!
//! Favourites are a set of lecture links held in memory and mirrored to
//! durable storage as a JSON array under a single key. Storage trouble is
//! never fatal: an unreadable or malformed value falls back to an empty set,
//! and after a failed write the in-memory set stays authoritative for the
//! rest of the session.

use std::collections::HashSet;

use crate::storage::{KvStore, StorageError};

const STORAGE_KEY: &str = "favourites";

#[derive(Clone, Debug, Default)]
pub(crate) struct Favourites {
    links: HashSet<String>,
}

impl Favourites {
    /// Restores the persisted set, substituting an empty set when the stored
    /// value is missing, unreadable, or malformed.
    pub(crate) fn load(store: &dyn KvStore) -> Self {
        let raw = match store.get(STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                log::debug!("no persisted favourites");
                return Self::default();
            }
            Err(e) => {
                log::warn!("failed to load favourites: {}", e);
                return Self::default();
            }
        };

        match serde_json::from_str::<serde_json::Value>(&raw) {
            Ok(serde_json::Value::Array(entries)) => {
                // Non-string entries are skipped rather than rejected, so a
                // later format can extend the array without breaking older
                // builds.
                let links = entries
                    .iter()
                    .filter_map(|entry| entry.as_str())
                    .map(str::to_owned)
                    .collect();
                Self { links }
            }
            Ok(_) => {
                log::warn!("persisted favourites are not an array, starting empty");
                Self::default()
            }
            Err(e) => {
                log::warn!("persisted favourites are malformed, starting empty: {}", e);
                Self::default()
            }
        }
    }

    /// Flips membership for a link, returning the new membership state.
    pub(crate) fn toggle(&mut self, link: &str) -> bool {
        if self.links.remove(link) {
            false
        } else {
            self.links.insert(link.to_owned());
            true
        }
    }

    pub(crate) fn is_favourite(&self, link: &str) -> bool {
        self.links.contains(link)
    }

    /// A copy of the membership set, for broadcasting to the UI thread.
    pub(crate) fn snapshot(&self) -> HashSet<String> {
        self.links.clone()
    }

    /// Overwrites the persisted value with the current membership.
    pub(crate) fn persist(&self, store: &dyn KvStore) -> Result<(), StorageError> {
        let links: Vec<&String> = self.links.iter().collect();
        let value =
            serde_json::to_string(&links).map_err(|e| StorageError::Write(e.to_string()))?;
        store.set(STORAGE_KEY, &value)
    }
}
