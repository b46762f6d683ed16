//! SQLite-backed preference flags.
//!
//! Persists the two durable booleans -- waiver accepted and safe mode --
//! plus the transient media-playing marker owned by external collaborators,
//! and a generic kv surface hosts use to park serialized engine state.
//!
//! Reads degrade instead of failing: consent falls back to "not granted"
//! (the gate shows) and safe mode falls back to "on". Uncertainty never
//! enables scares.

use rusqlite::{params, Connection};

use super::data_dir;
use crate::error::StorageError;

const WAIVER_KEY: &str = "waiver_accepted";
const SAFE_KEY: &str = "safe_mode";
const PLAY_KEY: &str = "media_playing";

/// Truthy marker for stored boolean flags.
const TRUTHY: &str = "1";

/// Durable local preference store.
pub struct PrefStore {
    conn: Connection,
}

impl PrefStore {
    /// Open the store at `~/.config/scareloop/scareloop.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, StorageError> {
        let path = data_dir()
            .map_err(|e| StorageError::QueryFailed(e.to_string()))?
            .join("scareloop.db");
        let conn = Connection::open(&path)
            .map_err(|source| StorageError::OpenFailed { path, source })?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    /// Open an in-memory store (for tests).
    #[cfg(test)]
    pub fn open_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )?;
        Ok(())
    }

    // ── Consent flags ────────────────────────────────────────────────

    /// Has the waiver been accepted?
    ///
    /// A storage failure reads as false: the gate shows again rather than
    /// the effect running on uncertain consent.
    pub fn consent(&self) -> bool {
        self.flag(WAIVER_KEY).unwrap_or(false)
    }

    /// Is safe mode enabled?
    ///
    /// A storage failure reads as true: fail safe, not fail scary.
    pub fn safe_mode(&self) -> bool {
        self.flag(SAFE_KEY).unwrap_or(true)
    }

    /// Record a plain waiver acceptance: consent granted, scares on.
    /// Clears any stored safe-mode marker.
    ///
    /// # Errors
    /// Returns an error if the write fails.
    pub fn accept_waiver(&self) -> Result<(), StorageError> {
        self.kv_set(WAIVER_KEY, TRUTHY)?;
        self.kv_delete(SAFE_KEY)?;
        Ok(())
    }

    /// Set or clear safe mode. Enabling it also records consent --
    /// granting and opting out happen together.
    ///
    /// # Errors
    /// Returns an error if the write fails.
    pub fn set_safe_mode(&self, enabled: bool) -> Result<(), StorageError> {
        if enabled {
            self.kv_set(WAIVER_KEY, TRUTHY)?;
            self.kv_set(SAFE_KEY, TRUTHY)?;
        } else {
            self.kv_delete(SAFE_KEY)?;
        }
        Ok(())
    }

    // ── Transient media flag ─────────────────────────────────────────

    /// Cross-feature "media is playing" marker. Not owned by the engine;
    /// unrelated features set and clear it.
    pub fn media_playing(&self) -> bool {
        self.flag(PLAY_KEY).unwrap_or(false)
    }

    /// Set or clear the media-playing marker.
    ///
    /// # Errors
    /// Returns an error if the write fails.
    pub fn set_media_playing(&self, playing: bool) -> Result<(), StorageError> {
        if playing {
            self.kv_set(PLAY_KEY, TRUTHY)?;
        } else {
            self.kv_delete(PLAY_KEY)?;
        }
        Ok(())
    }

    // ── Generic kv ───────────────────────────────────────────────────

    pub fn kv_get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let mut rows = stmt.query(params![key])?;
        match rows.next()? {
            Some(row) => Ok(Some(row.get(0)?)),
            None => Ok(None),
        }
    }

    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    pub fn kv_delete(&self, key: &str) -> Result<(), StorageError> {
        self.conn.execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }

    fn flag(&self, key: &str) -> Result<bool, StorageError> {
        Ok(self.kv_get(key)?.as_deref() == Some(TRUTHY))
    }
}
