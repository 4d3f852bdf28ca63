use lunchly_db::{create_pool, run_migrations, DbRuntimeSettings};

#[test]
fn file_backed_pool_uses_wal_and_shares_schema() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let path = dir.path().join("lunchly.db");
    let path = path.to_str().expect("temp path should be utf-8");

    let pool = create_pool(path, DbRuntimeSettings::default()).expect("failed to create pool");

    {
        let conn = pool.get().expect("failed to get connection");
        let applied = run_migrations(&conn).expect("failed to run migrations");
        assert_eq!(applied, 2);

        let mode: String = conn
            .query_row("PRAGMA journal_mode;", [], |row| row.get(0))
            .expect("failed to query journal_mode");
        assert_eq!(mode, "wal");

        conn.execute(
            "INSERT INTO customers (first_name, last_name) VALUES ('Grace', 'Hopper')",
            [],
        )
        .expect("failed to insert customer");
    }

    // A second checkout may land on another pooled connection; both see the same file.
    let a = pool.get().expect("failed to get first connection");
    let b = pool.get().expect("failed to get second connection");
    for conn in [&a, &b] {
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM customers", [], |row| row.get(0))
            .expect("failed to count customers");
        assert_eq!(count, 1);
    }
}

#[test]
fn foreign_keys_are_enforced_on_pooled_connections() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let path = dir.path().join("fk.db");
    let pool = create_pool(
        path.to_str().expect("temp path should be utf-8"),
        DbRuntimeSettings::default(),
    )
    .expect("failed to create pool");

    let conn = pool.get().expect("failed to get connection");
    run_migrations(&conn).expect("failed to run migrations");

    let result = conn.execute(
        "INSERT INTO reservations (customer_id, start_at, num_guests)
         VALUES (999, '2026-03-01T18:30:00Z', 2)",
        [],
    );
    assert!(result.is_err(), "reservation for unknown customer should fail");

    let tables: Vec<String> = {
        let mut stmt = conn
            .prepare(
                "SELECT name FROM sqlite_master
                 WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
            )
            .expect("failed to prepare table query");
        let rows = stmt
            .query_map([], |row| row.get(0))
            .expect("failed to list tables");
        let names: Vec<String> = rows.map(|r| r.expect("failed to read table name")).collect();
        names
    };
    assert_eq!(tables, vec!["_lunchly_migrations", "customers", "reservations"]);
}
