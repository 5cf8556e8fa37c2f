//! Transactional key-value store backing the operation log and preferences.
//!
//! A single SQLite table holds every logical namespace (`Space`). Keys are
//! BLOBs compared with memcmp, so keys built with [`keys::KeyBuf`] iterate
//! in tuple order with a plain forward scan.
//!
//! All access goes through [`Database::transaction`], which hands the
//! closure a [`Transaction`] and commits only if the closure returns `Ok`.
//! An `Err`, an early return through `?`, or a panic drops the underlying
//! SQLite transaction, which rolls it back. The connection sits behind a
//! mutex: at most one transaction is in flight at any time.
//!
//! Schema:
//! ```sql
//! CREATE TABLE kv (
//!   space INTEGER NOT NULL,
//!   key   BLOB    NOT NULL,
//!   value BLOB    NOT NULL,
//!   PRIMARY KEY (space, key)
//! ) WITHOUT ROWID;
//! ```

pub mod keys;

use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Failed to create {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Record serialization failed: {0}")]
    Record(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

const SCHEMA_VERSION: i64 = 1;

// ---------------------------------------------------------------------------
// Space
// ---------------------------------------------------------------------------

/// Logical namespaces inside the `kv` table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Space {
    /// `(peer, tag, local_sequence) -> stored entry`
    OperationLog = 1,
    /// `(domain, merged_sequence) -> operation log key`
    MergedIndex = 2,
    /// next-sequence counters
    Counters = 3,
    /// entries that failed to decode
    Quarantine = 4,
    Preferences = 5,
    /// `(peer, namespace) -> top message id`
    MessageIndex = 6,
}

// ---------------------------------------------------------------------------
// KeyRange
// ---------------------------------------------------------------------------

/// Half-open key range: `lower` (inclusive or exclusive) up to `upper`
/// (exclusive, unbounded when `None`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyRange {
    pub lower: Vec<u8>,
    pub lower_inclusive: bool,
    pub upper: Option<Vec<u8>>,
}

impl KeyRange {
    /// Every key that starts with `prefix`.
    pub fn prefix(prefix: &[u8]) -> Self {
        KeyRange {
            lower: prefix.to_vec(),
            lower_inclusive: true,
            upper: keys::prefix_successor(prefix),
        }
    }

    /// Same upper bound, continuing strictly after `key`.
    pub fn after(&self, key: &[u8]) -> Self {
        KeyRange {
            lower: key.to_vec(),
            lower_inclusive: false,
            upper: self.upper.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Database
// ---------------------------------------------------------------------------

pub struct Database {
    conn: Mutex<Connection>,
    path: Option<PathBuf>,
}

impl Database {
    /// Open (or create) a durable store at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }
        let conn = Connection::open(&path)?;
        let db = Self::init(conn, Some(path))?;
        log::info!("Operation store opened at {:?}", db.path);
        Ok(db)
    }

    /// Volatile store, for tests and ephemeral sessions.
    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?, None)
    }

    fn init(conn: Connection, path: Option<PathBuf>) -> Result<Self> {
        let _mode: String =
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
        conn.pragma_update(None, "synchronous", "FULL")?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                space INTEGER NOT NULL,
                key   BLOB    NOT NULL,
                value BLOB    NOT NULL,
                PRIMARY KEY (space, key)
            ) WITHOUT ROWID;",
        )?;

        let version: i64 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
        if version == 0 {
            conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
        } else if version != SCHEMA_VERSION {
            log::warn!(
                "Operation store schema version {} (expected {})",
                version,
                SCHEMA_VERSION
            );
        }

        Ok(Database {
            conn: Mutex::new(conn),
            path,
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Run `f` inside a write transaction; commit on `Ok`, roll back otherwise.
    pub fn transaction<T, E, F>(&self, f: F) -> std::result::Result<T, E>
    where
        F: FnOnce(&Transaction<'_>) -> std::result::Result<T, E>,
        E: From<StoreError>,
    {
        // A panic inside an earlier closure already rolled its transaction
        // back when the SQLite handle was dropped, so the connection is clean.
        let mut conn = self.conn.lock().unwrap_or_else(|poisoned| {
            log::warn!("Recovering operation store after a panicked transaction");
            poisoned.into_inner()
        });
        let inner = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(StoreError::from)?;
        let txn = Transaction { inner };
        let value = f(&txn)?;
        txn.inner.commit().map_err(StoreError::from)?;
        Ok(value)
    }
}

// ---------------------------------------------------------------------------
// Transaction
// ---------------------------------------------------------------------------

/// Handle passed into every store operation. Never outlives the closure it
/// was handed to.
pub struct Transaction<'conn> {
    inner: rusqlite::Transaction<'conn>,
}

impl Transaction<'_> {
    pub fn get(&self, space: Space, key: &[u8]) -> Result<Option<Vec<u8>>> {
        let mut stmt = self
            .inner
            .prepare_cached("SELECT value FROM kv WHERE space = ?1 AND key = ?2")?;
        let value = stmt
            .query_row(params![space as u8, key], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    pub fn put(&self, space: Space, key: &[u8], value: &[u8]) -> Result<()> {
        let mut stmt = self
            .inner
            .prepare_cached("INSERT OR REPLACE INTO kv (space, key, value) VALUES (?1, ?2, ?3)")?;
        stmt.execute(params![space as u8, key, value])?;
        Ok(())
    }

    /// Returns whether a row was deleted.
    pub fn remove(&self, space: Space, key: &[u8]) -> Result<bool> {
        let mut stmt = self
            .inner
            .prepare_cached("DELETE FROM kv WHERE space = ?1 AND key = ?2")?;
        let changed = stmt.execute(params![space as u8, key])?;
        Ok(changed > 0)
    }

    /// Up to `limit` pairs in ascending key order.
    pub fn scan(
        &self,
        space: Space,
        range: &KeyRange,
        limit: usize,
    ) -> Result<Vec<(Vec<u8>, Vec<u8>)>> {
        let lower_op = if range.lower_inclusive { ">=" } else { ">" };
        let limit = limit.min(i64::MAX as usize) as i64;

        let mut out = Vec::new();
        match &range.upper {
            Some(upper) => {
                let sql = format!(
                    "SELECT key, value FROM kv WHERE space = ?1 AND key {} ?2 AND key < ?3 \
                     ORDER BY key ASC LIMIT ?4",
                    lower_op
                );
                let mut stmt = self.inner.prepare_cached(&sql)?;
                let rows = stmt.query_map(
                    params![space as u8, range.lower, upper, limit],
                    |row| Ok((row.get(0)?, row.get(1)?)),
                )?;
                for row in rows {
                    out.push(row?);
                }
            }
            None => {
                let sql = format!(
                    "SELECT key, value FROM kv WHERE space = ?1 AND key {} ?2 \
                     ORDER BY key ASC LIMIT ?3",
                    lower_op
                );
                let mut stmt = self.inner.prepare_cached(&sql)?;
                let rows = stmt.query_map(params![space as u8, range.lower, limit], |row| {
                    Ok((row.get(0)?, row.get(1)?))
                })?;
                for row in rows {
                    out.push(row?);
                }
            }
        }
        Ok(out)
    }

    /// Number of keys in `range`.
    pub fn count(&self, space: Space, range: &KeyRange) -> Result<usize> {
        let lower_op = if range.lower_inclusive { ">=" } else { ">" };
        let count: i64 = match &range.upper {
            Some(upper) => {
                let sql = format!(
                    "SELECT COUNT(*) FROM kv WHERE space = ?1 AND key {} ?2 AND key < ?3",
                    lower_op
                );
                self.inner
                    .prepare_cached(&sql)?
                    .query_row(params![space as u8, range.lower, upper], |row| row.get(0))?
            }
            None => {
                let sql = format!(
                    "SELECT COUNT(*) FROM kv WHERE space = ?1 AND key {} ?2",
                    lower_op
                );
                self.inner
                    .prepare_cached(&sql)?
                    .query_row(params![space as u8, range.lower], |row| row.get(0))?
            }
        };
        Ok(count.max(0) as usize)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
