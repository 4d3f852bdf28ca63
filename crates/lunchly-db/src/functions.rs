//! Application-defined SQL functions.
//!
//! SQLite's built-in `LOWER()` and `LIKE` only fold ASCII letters, so name
//! searches go through `unicode_lower` instead. Every connection that runs
//! customer queries must have these registered; [`crate::create_pool`] does
//! it for pooled connections.

use rusqlite::functions::FunctionFlags;
use rusqlite::Connection;

/// Name of the Unicode-aware lowercase function.
pub const UNICODE_LOWER: &str = "unicode_lower";

/// Registers the application's scalar functions on `conn`.
pub fn register_functions(conn: &Connection) -> rusqlite::Result<()> {
    conn.create_scalar_function(
        UNICODE_LOWER,
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let text: Option<String> = ctx.get(0)?;
            Ok(text.map(|s| s.to_lowercase()))
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unicode_lower_folds_non_ascii() {
        let conn = Connection::open_in_memory().expect("should open in-memory db");
        register_functions(&conn).expect("should register functions");

        let lowered: String = conn
            .query_row("SELECT unicode_lower('ÉMILE ÖZTÜRK')", [], |row| row.get(0))
            .expect("should call unicode_lower");
        assert_eq!(lowered, "émile öztürk");

        let null: Option<String> = conn
            .query_row("SELECT unicode_lower(NULL)", [], |row| row.get(0))
            .expect("should accept NULL");
        assert_eq!(null, None);
    }
}
