//! Pooled SQLite connections.
//!
//! Every connection handed out by the pool has already been prepared:
//! busy timeout, WAL journal, foreign keys and the Unicode search function.

use crate::functions::register_functions;
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;
use std::time::Duration;
use thiserror::Error;

/// Pool size and lock-wait tunables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DbRuntimeSettings {
    /// How long a statement waits on a locked database, in milliseconds.
    pub busy_timeout_ms: u64,
    /// Upper bound on open connections.
    pub pool_max_size: u32,
}

impl Default for DbRuntimeSettings {
    fn default() -> Self {
        Self {
            busy_timeout_ms: 5_000,
            pool_max_size: 8,
        }
    }
}

pub type DbPool = Pool<SqliteConnectionManager>;

/// Building the pool or checking a connection out of it failed.
#[derive(Debug, Error)]
pub enum PoolError {
    #[error("database pool error: {0}")]
    Pool(#[from] r2d2::Error),
}

/// Opens a pool over the database file at `db_path`.
///
/// `:memory:` gives each pooled connection a separate empty database; use a
/// pool size of 1 with it.
pub fn create_pool(db_path: &str, settings: DbRuntimeSettings) -> Result<DbPool, PoolError> {
    let manager = SqliteConnectionManager::file(db_path)
        .with_init(move |conn| prepare_connection(conn, &settings));

    let pool = Pool::builder()
        .max_size(settings.pool_max_size)
        .build(manager)?;

    tracing::debug!(
        path = db_path,
        max_size = settings.pool_max_size,
        "opened database pool"
    );
    Ok(pool)
}

fn prepare_connection(conn: &Connection, settings: &DbRuntimeSettings) -> rusqlite::Result<()> {
    // Set before the journal switch: connections open concurrently and the
    // switch needs a lock.
    conn.busy_timeout(Duration::from_millis(settings.busy_timeout_ms))?;

    let mode: String =
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
    if mode != "wal" && mode != "memory" {
        return Err(rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_ERROR),
            Some(format!("database refused WAL journaling (mode is {mode})")),
        ));
    }

    conn.pragma_update(None, "foreign_keys", true)?;
    register_functions(conn)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pooled_connections_are_prepared() {
        let settings = DbRuntimeSettings {
            busy_timeout_ms: 2_500,
            pool_max_size: 1,
        };
        let pool = create_pool(":memory:", settings).expect("pool creation should succeed");
        assert_eq!(pool.max_size(), 1);

        let conn = pool.get().expect("should get a connection");

        let fk: i32 = conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .expect("should read foreign_keys");
        let busy: i32 = conn
            .query_row("PRAGMA busy_timeout", [], |row| row.get(0))
            .expect("should read busy_timeout");
        assert_eq!(fk, 1);
        assert_eq!(busy, 2_500);

        let lowered: String = conn
            .query_row("SELECT unicode_lower('ÇA')", [], |row| row.get(0))
            .expect("search function should be registered");
        assert_eq!(lowered, "ça");
    }
}
