//! Connection bootstrap for the slot database.
//!
//! # Invariants
//! - Returned connections carry the `kv_slots` table at `SCHEMA_VERSION`.
//! - Parent directories of file databases are created on demand.
//! - A database stamped with a newer `user_version` is refused untouched.

use super::{DbError, DbResult};
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

/// Table layout version written to `PRAGMA user_version`.
///
/// Covers the table only; the JSON stored in a slot is not versioned.
pub const SCHEMA_VERSION: u32 = 1;

const KV_SLOTS_TABLE: &str = "
CREATE TABLE IF NOT EXISTS kv_slots (
    key TEXT PRIMARY KEY NOT NULL,
    value TEXT NOT NULL,
    updated_at INTEGER NOT NULL
);";

/// Opens the slot database at `path`, creating it when missing.
///
/// Emits `db_open` events with duration and status.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    let path = path.as_ref();
    open_with("file", || {
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        Ok(Connection::open(path)?)
    })
}

/// Opens a throwaway in-memory slot database.
pub fn open_db_in_memory() -> DbResult<Connection> {
    open_with("memory", || Ok(Connection::open_in_memory()?))
}

fn open_with(
    mode: &'static str,
    connect: impl FnOnce() -> DbResult<Connection>,
) -> DbResult<Connection> {
    let started_at = Instant::now();
    let opened = connect().and_then(|mut conn| {
        conn.busy_timeout(Duration::from_secs(5))?;
        ensure_schema(&mut conn)?;
        Ok(conn)
    });

    match &opened {
        Ok(_) => info!(
            "event=db_open module=db status=ok mode={} duration_ms={}",
            mode,
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event=db_open module=db status=error mode={} duration_ms={} error={}",
            mode,
            started_at.elapsed().as_millis(),
            err
        ),
    }
    opened
}

/// Creates the slot table on a fresh database and stamps its version.
pub fn ensure_schema(conn: &mut Connection) -> DbResult<()> {
    let found: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if found > SCHEMA_VERSION {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: found,
            latest_supported: SCHEMA_VERSION,
        });
    }
    if found == SCHEMA_VERSION {
        return Ok(());
    }

    let tx = conn.transaction()?;
    tx.execute_batch(KV_SLOTS_TABLE)?;
    tx.pragma_update(None, "user_version", SCHEMA_VERSION)?;
    tx.commit()?;
    Ok(())
}
