//! Persisted key-value store shared by the engine and the CLI.
//!
//! Every entry is a JSON document stored under a string key (see
//! [`keys`](super::keys)). Each write that actually changes a value bumps a
//! store-wide revision counter, which lets the background engine pick up
//! edits made by other processes with [`Store::changes_since`], much like a
//! change listener.
//!
//! A second table holds a small queue of engine commands (`start-timer`,
//! `stop-timer`) that the CLI pushes and the engine drains.
//!
//! Writes made on every tick go through [`Store::set_deferred`]: they never
//! wait on a database locked by another process. A write that finds the
//! database busy is kept, latest value per key, until
//! [`Store::flush_pending`] gets it through or a regular write to the same
//! key replaces it.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use pomodoro_grande::db::{keys, store::Store};
//!
//! let store = Store::new()?;
//! store.set(keys::WORK_TIME, &1_500_000u64)?;
//! let work: Option<u64> = store.get(keys::WORK_TIME)?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use crate::db::db::Db;
use anyhow::Result;
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// How long regular writes wait for a lock held by another process.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS kv (
        key TEXT NOT NULL PRIMARY KEY,
        value TEXT NOT NULL,
        revision INTEGER NOT NULL
    );
    CREATE TABLE IF NOT EXISTS commands (
        id INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
    );
    CREATE INDEX IF NOT EXISTS idx_kv_revision ON kv(revision);
";

/// Writes a value and bumps the revision, leaving unchanged values untouched.
const UPSERT_VALUE: &str = "INSERT INTO kv (key, value, revision)
    VALUES (?1, ?2, (SELECT COALESCE(MAX(revision), 0) + 1 FROM kv))
    ON CONFLICT(key) DO UPDATE SET value = excluded.value, revision = excluded.revision
    WHERE kv.value <> excluded.value";
const SELECT_VALUE: &str = "SELECT value FROM kv WHERE key = ?1";
const SELECT_CHANGES: &str = "SELECT key, value, revision FROM kv WHERE revision > ?1 ORDER BY revision";
const SELECT_REVISION: &str = "SELECT COALESCE(MAX(revision), 0) FROM kv";
const INSERT_COMMAND: &str = "INSERT INTO commands (name) VALUES (?1)";
const SELECT_COMMANDS: &str = "SELECT id, name FROM commands ORDER BY id";
const DELETE_COMMANDS_UP_TO: &str = "DELETE FROM commands WHERE id <= ?1";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("invalid value stored under '{key}': {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("cannot encode value for '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// One stored entry as reported by [`Store::changes_since`].
#[derive(Debug, Clone, PartialEq)]
pub struct Change {
    pub key: String,
    pub value: Value,
    pub revision: i64,
}

/// Handle to the store. Cloning is cheap; clones share one connection and
/// one set of deferred writes.
#[derive(Clone)]
pub struct Store {
    conn: Arc<Mutex<Connection>>,
    pending: Arc<Mutex<HashMap<String, String>>>,
}

impl Store {
    /// Opens the store in the user's data directory.
    pub fn new() -> Result<Self> {
        let db = Db::new()?;
        Ok(Self::from_connection(db.conn)?)
    }

    /// Opens a throwaway store that lives only as long as its handles.
    pub fn in_memory() -> Result<Self> {
        let db = Db::in_memory()?;
        Ok(Self::from_connection(db.conn)?)
    }

    pub fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            pending: Arc::new(Mutex::new(HashMap::new())),
        })
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        match self.get_raw(key)? {
            Some(value) => serde_json::from_value(value)
                .map(Some)
                .map_err(|source| StoreError::Decode { key: key.to_string(), source }),
            None => Ok(None),
        }
    }

    pub fn get_raw(&self, key: &str) -> Result<Option<Value>, StoreError> {
        if let Some(raw) = self.pending.lock().get(key) {
            return decode(key, raw).map(Some);
        }
        let conn = self.conn.lock();
        let raw: Option<String> = conn.query_row(SELECT_VALUE, params![key], |row| row.get(0)).optional()?;
        raw.map(|raw| decode(key, &raw)).transpose()
    }

    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let json = encode(key, value)?;
        let mut pending = self.pending.lock();
        pending.remove(key);
        self.conn.lock().execute(UPSERT_VALUE, params![key, json])?;
        Ok(())
    }

    /// Writes a value without waiting for a database locked elsewhere.
    ///
    /// Returns `false` when the database was busy and the value was kept for
    /// [`Store::flush_pending`]. Reads through this handle see it either way.
    pub fn set_deferred<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<bool, StoreError> {
        let json = encode(key, value)?;
        let mut pending = self.pending.lock();
        let conn = self.conn.lock();
        if try_upsert(&conn, key, &json)? {
            pending.remove(key);
            Ok(true)
        } else {
            pending.insert(key.to_string(), json);
            Ok(false)
        }
    }

    /// Retries deferred writes. Returns how many are still waiting.
    pub fn flush_pending(&self) -> Result<usize, StoreError> {
        let mut pending = self.pending.lock();
        if pending.is_empty() {
            return Ok(0);
        }
        let conn = self.conn.lock();
        let mut failure = None;
        pending.retain(|key, json| match try_upsert(&conn, key, json) {
            Ok(written) => !written,
            Err(e) => {
                failure.get_or_insert(e);
                true
            }
        });
        match failure {
            Some(e) => Err(e),
            None => Ok(pending.len()),
        }
    }

    /// Writes several entries in one transaction.
    pub fn set_many(&self, entries: &[(&str, Value)]) -> Result<(), StoreError> {
        let mut pending = self.pending.lock();
        for (key, _) in entries {
            pending.remove(*key);
        }
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        for (key, value) in entries {
            tx.execute(UPSERT_VALUE, params![key, value.to_string()])?;
        }
        tx.commit()?;
        Ok(())
    }

    pub fn contains(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.get_raw(key)?.is_some())
    }

    /// Latest revision written to the store, `0` for an empty store.
    pub fn revision(&self) -> Result<i64, StoreError> {
        Ok(self.conn.lock().query_row(SELECT_REVISION, [], |row| row.get(0))?)
    }

    /// Entries written after `revision`, oldest first. Passing `0` returns
    /// every entry.
    pub fn changes_since(&self, revision: i64) -> Result<Vec<Change>, StoreError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(SELECT_CHANGES)?;
        let rows = stmt.query_map(params![revision], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?, row.get::<_, i64>(2)?))
        })?;

        let mut changes = Vec::new();
        for row in rows {
            let (key, raw, revision) = row?;
            let value = decode(&key, &raw)?;
            changes.push(Change { key, value, revision });
        }
        Ok(changes)
    }

    pub fn push_command(&self, name: &str) -> Result<(), StoreError> {
        self.conn.lock().execute(INSERT_COMMAND, params![name])?;
        Ok(())
    }

    /// Removes and returns every queued command in the order it was pushed.
    pub fn take_commands(&self) -> Result<Vec<String>, StoreError> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        let commands = {
            let mut stmt = tx.prepare(SELECT_COMMANDS)?;
            let rows = stmt.query_map([], |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?)))?;
            rows.collect::<Result<Vec<_>, _>>()?
        };
        if let Some((last_id, _)) = commands.last() {
            tx.execute(DELETE_COMMANDS_UP_TO, params![last_id])?;
        }
        tx.commit()?;
        Ok(commands.into_iter().map(|(_, name)| name).collect())
    }
}

fn encode<T: Serialize + ?Sized>(key: &str, value: &T) -> Result<String, StoreError> {
    serde_json::to_string(value).map_err(|source| StoreError::Encode { key: key.to_string(), source })
}

/// Upserts with no busy wait. `Ok(false)` means another connection holds the lock.
fn try_upsert(conn: &Connection, key: &str, json: &str) -> Result<bool, StoreError> {
    conn.busy_timeout(Duration::ZERO)?;
    let result = conn.execute(UPSERT_VALUE, params![key, json]);
    conn.busy_timeout(BUSY_TIMEOUT)?;
    match result {
        Ok(_) => Ok(true),
        Err(rusqlite::Error::SqliteFailure(e, _))
            if matches!(e.code, rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked) =>
        {
            Ok(false)
        }
        Err(e) => Err(e.into()),
    }
}

fn decode(key: &str, raw: &str) -> Result<Value, StoreError> {
    serde_json::from_str(raw).map_err(|source| StoreError::Decode { key: key.to_string(), source })
}
