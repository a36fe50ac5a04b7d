use daybook_core::db::migrations::latest_version;
use daybook_core::db::{open_db, open_db_in_memory, DbError};
use rusqlite::Connection;

fn table_exists(conn: &Connection, name: &str) -> bool {
    conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1;",
        [name],
        |row| row.get::<_, i64>(0),
    )
    .unwrap()
        > 0
}

fn user_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

#[test]
fn open_creates_both_collections() {
    let conn = open_db_in_memory().unwrap();
    assert!(table_exists(&conn, "tasks"));
    assert!(table_exists(&conn, "journal_entries"));
    assert_eq!(user_version(&conn), latest_version());
}

#[test]
fn reopening_an_existing_database_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("daybook.db");

    {
        let conn = open_db(&path).unwrap();
        conn.execute(
            "INSERT INTO tasks (id, title, category, priority, completed, created_at)
             VALUES ('00000000-0000-0000-0000-000000000001', 'keep', 'Personal', 'medium', 0, '2026-01-01T00:00:00Z');",
            [],
        )
        .unwrap();
    }

    let conn = open_db(&path).unwrap();
    assert_eq!(user_version(&conn), latest_version());
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM tasks;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn databases_from_a_newer_build_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("daybook.db");

    {
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version() + 1))
            .unwrap();
    }

    let err = open_db(&path).unwrap_err();
    assert!(matches!(err, DbError::UnsupportedSchemaVersion { .. }));
}

#[test]
fn foreign_keys_are_enabled() {
    let conn = open_db_in_memory().unwrap();
    let enabled: i64 = conn
        .query_row("PRAGMA foreign_keys;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(enabled, 1);
}
