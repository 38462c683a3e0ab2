//! SQLite implementation of the EntityStore trait.
//!
//! The primary persistent backend: one `records` table keyed by soul,
//! with JSON record bodies. rusqlite with bundled SQLite, wrapped in
//! async via tokio::spawn_blocking.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use keyrights_core::Soul;
use rusqlite::{params, Connection, OptionalExtension};

use crate::error::{Result, StoreError};
use crate::migration;
use crate::traits::EntityStore;

/// SQLite-based store implementation.
///
/// Thread-safe via internal Mutex. All operations use spawn_blocking
/// to avoid blocking the async runtime.
pub struct SqliteStore {
    /// The SQLite connection, protected by a mutex.
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open a SQLite database at the given path, running migrations.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut conn = Connection::open(path)?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory SQLite database. Useful for testing.
    pub fn open_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run a blocking operation against the connection on the blocking
    /// pool.
    async fn run_blocking<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let conn = conn.lock().map_err(|e| {
                StoreError::Database(rusqlite::Error::SqliteFailure(
                    rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_LOCKED),
                    Some(format!("mutex poisoned: {e}")),
                ))
            })?;
            f(&conn)
        })
        .await
        .map_err(|e| {
            StoreError::Database(rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_ERROR),
                Some(format!("spawn_blocking failed: {e}")),
            ))
        })?
    }
}

/// Upper bound for a textual prefix range scan. Souls are ASCII, so any
/// multi-byte code point sorts after every extension of the prefix.
fn prefix_upper_bound(prefix: &str) -> String {
    format!("{prefix}\u{10FFFF}")
}

#[async_trait]
impl EntityStore for SqliteStore {
    async fn get(&self, soul: &Soul) -> Result<Option<String>> {
        let soul = soul.as_str().to_owned();
        self.run_blocking(move |conn| {
            let record = conn
                .query_row(
                    "SELECT record FROM records WHERE soul = ?1",
                    params![soul],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(record)
        })
        .await
    }

    async fn put(&self, soul: &Soul, record: &str) -> Result<()> {
        let soul = soul.as_str().to_owned();
        let record = record.to_owned();
        self.run_blocking(move |conn| {
            conn.execute(
                "INSERT INTO records (soul, record) VALUES (?1, ?2)
                 ON CONFLICT(soul) DO UPDATE SET record = excluded.record",
                params![soul, record],
            )?;
            Ok(())
        })
        .await
    }

    async fn delete(&self, soul: &Soul) -> Result<()> {
        let soul = soul.as_str().to_owned();
        self.run_blocking(move |conn| {
            conn.execute("DELETE FROM records WHERE soul = ?1", params![soul])?;
            Ok(())
        })
        .await
    }

    async fn scan_prefix(&self, prefix: &Soul) -> Result<Vec<(Soul, String)>> {
        let prefix = prefix.as_str().to_owned();
        self.run_blocking(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT soul, record FROM records
                 WHERE soul >= ?1 AND soul < ?2
                 ORDER BY soul",
            )?;
            let rows = stmt.query_map(
                params![prefix, prefix_upper_bound(&prefix)],
                |row| {
                    let soul: String = row.get(0)?;
                    let record: String = row.get(1)?;
                    Ok((Soul::from_raw(soul), record))
                },
            )?;
            let mut records = Vec::new();
            for row in rows {
                records.push(row?);
            }
            Ok(records)
        })
        .await
    }
}
