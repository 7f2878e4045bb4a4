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

//! Durable key-value storage.
//!
//! Persistence goes through the narrow [`KvStore`] trait so the favourites
//! store can be exercised against an in-memory database in tests. The
//! production implementation keeps a single `kv` table in SQLite, owned by
//! the command worker thread.

use anyhow::{Context, Result, bail};
use rusqlite::{Connection, OptionalExtension, params};
use thiserror::Error;

/// Storage failures, split by direction so callers can phrase their soft
/// failure handling.
#[derive(Debug, Error)]
pub(crate) enum StorageError {
    #[error("Storage read failed: {0}")]
    Read(String),
    #[error("Storage write failed: {0}")]
    Write(String),
}

/// Minimal string key-value contract used for persistence.
pub(crate) trait KvStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// SQLite-backed [`KvStore`].
pub(crate) struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens (creating if necessary) the database file and ensures the
    /// schema exists.
    pub(crate) fn open(file: &str) -> Result<Self> {
        let conn = Connection::open(file).context("Failed to open database")?;

        let journal_mode: String = conn
            .query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))
            .context("Failed to set journal mode")?;
        if journal_mode != "wal" {
            bail!("Failed to switch to WAL mode. Current mode: {}", journal_mode);
        }
        conn.execute_batch("PRAGMA synchronous = NORMAL;")
            .context("Failed to set synchronous mode")?;

        Self::with_connection(conn)
    }

    /// An in-memory database, used by tests.
    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )
        .context("Failed to create schema")?;

        Ok(Self { conn })
    }
}

impl KvStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let mut statement = self
            .conn
            .prepare_cached("SELECT value FROM kv WHERE key = ?1")
            .map_err(|e| StorageError::Read(e.to_string()))?;

        statement
            .query_row(params![key], |row| row.get(0))
            .optional()
            .map_err(|e| StorageError::Read(e.to_string()))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut statement = self
            .conn
            .prepare_cached(
                "INSERT INTO kv (key, value) VALUES (?1, ?2)
                 ON CONFLICT (key) DO UPDATE SET value = ?2",
            )
            .map_err(|e| StorageError::Write(e.to_string()))?;

        statement
            .execute(params![key, value])
            .map_err(|e| StorageError::Write(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_of_an_unknown_key_is_none() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert_eq!(store.get("favourites").unwrap(), None);
    }

    #[test]
    fn set_then_get_round_trips() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.set("favourites", "[\"a\"]").unwrap();
        assert_eq!(store.get("favourites").unwrap().as_deref(), Some("[\"a\"]"));
    }

    #[test]
    fn set_overwrites_an_existing_value() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.set("favourites", "[]").unwrap();
        store.set("favourites", "[\"a\",\"b\"]").unwrap();
        assert_eq!(
            store.get("favourites").unwrap().as_deref(),
            Some("[\"a\",\"b\"]")
        );
    }

    #[test]
    fn keys_are_independent() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.set("favourites", "[]").unwrap();
        store.set("other", "x").unwrap();
        assert_eq!(store.get("favourites").unwrap().as_deref(), Some("[]"));
        assert_eq!(store.get("other").unwrap().as_deref(), Some("x"));
    }
}
