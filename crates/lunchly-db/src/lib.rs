//! Database layer for Lunchly.
//!
//! Provides SQLite connection pooling (via `r2d2`), WAL-mode initialization,
//! the `unicode_lower` SQL function used by name searches, and the embedded
//! SQL migrations that create the `customers` and `reservations` tables.
//!
//! The pool is created once by the caller and handed to whoever needs a
//! connection. Nothing in this crate holds a process-wide handle.

mod functions;
mod migrations;
mod pool;

pub use functions::{register_functions, UNICODE_LOWER};
pub use migrations::{run_migrations, MigrationError};
pub use pool::{create_pool, DbPool, DbRuntimeSettings, PoolError};
