use rusqlite::Connection;
use storyvault_core::db::migrations::latest_version;
use storyvault_core::db::{open_db, open_db_in_memory, DbError};

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "projects");
    assert_table_exists(&conn, "chapters");
    assert_table_exists(&conn, "notes");
    assert_table_exists(&conn, "note_tags");
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storyvault.db");

    let conn_first = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_first), latest_version());
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    assert_table_exists(&conn_second, "chapters");
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn project_status_and_note_category_are_constrained() {
    let conn = open_db_in_memory().unwrap();

    let bad_status = conn.execute(
        "INSERT INTO projects (uuid, title, author, description, status, cover)
         VALUES ('p1', 't', 'a', 'd', 'abandoned', 'default');",
        [],
    );
    assert!(bad_status.is_err());

    conn.execute(
        "INSERT INTO projects (uuid, title, author, description, status, cover)
         VALUES ('p1', 't', 'a', 'd', 'serializing', 'default');",
        [],
    )
    .unwrap();
    let bad_category = conn.execute(
        "INSERT INTO notes (uuid, project_uuid, position, category, name, description, content)
         VALUES ('n1', 'p1', 0, 'rumor', 'n', 'd', 'c');",
        [],
    );
    assert!(bad_category.is_err());
}

#[test]
fn deleting_project_cascades_to_children() {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch(
        "INSERT INTO projects (uuid, title, author, description, status, cover)
         VALUES ('p1', 't', 'a', 'd', 'completed', 'default');
         INSERT INTO chapters (uuid, project_uuid, position, title, content, summary)
         VALUES ('c1', 'p1', 0, 'One', 'text', NULL);
         INSERT INTO notes (uuid, project_uuid, position, category, name, description, content)
         VALUES ('n1', 'p1', 0, 'character', 'Bob', 'd', 'c');
         INSERT INTO note_tags (note_uuid, position, tag) VALUES ('n1', 0, 'smith');
         DELETE FROM projects WHERE uuid = 'p1';",
    )
    .unwrap();

    for table in ["chapters", "notes", "note_tags"] {
        let count: i64 = conn
            .query_row(&format!("SELECT COUNT(*) FROM {table};"), [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(count, 0, "{table} rows survived project delete");
    }
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
