//! Database schema migrations for SQLite.
//!
//! Simple versioned migrations: each migration transforms the schema
//! from version N to N+1.

use rusqlite::Connection;

use crate::error::{Result, StoreError};

/// Current schema version.
pub const CURRENT_VERSION: u32 = 1;

/// Initialize or migrate the database schema. Idempotent.
pub fn migrate(conn: &mut Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at INTEGER NOT NULL
        )",
        [],
    )?;

    let current: u32 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .unwrap_or(0);

    if current < CURRENT_VERSION {
        let tx = conn.transaction()?;
        for version in (current + 1)..=CURRENT_VERSION {
            apply_migration(&tx, version)?;
            tx.execute(
                "INSERT INTO schema_migrations (version, applied_at) VALUES (?1, strftime('%s','now'))",
                [version],
            )?;
        }
        tx.commit()?;
    }

    Ok(())
}

fn apply_migration(tx: &rusqlite::Transaction<'_>, version: u32) -> Result<()> {
    match version {
        1 => {
            tx.execute_batch(
                "CREATE TABLE records (
                    soul TEXT PRIMARY KEY,
                    record TEXT NOT NULL
                ) WITHOUT ROWID;",
            )?;
            Ok(())
        }
        other => Err(StoreError::Serialization(format!(
            "unknown schema version {other}"
        ))),
    }
}
