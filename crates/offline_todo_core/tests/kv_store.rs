use offline_todo_core::db::migrations::latest_version;
use offline_todo_core::db::{open_db, open_db_in_memory, DbError};
use offline_todo_core::{KeyValueStore, KvError, SqliteKvStore, PASSWORD_KEY, TODOS_KEY};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert!(SqliteKvStore::try_new(&conn).is_ok());
}

#[test]
fn set_get_remove_roundtrip_and_upsert() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteKvStore::try_new(&conn).unwrap();

    assert_eq!(store.get(PASSWORD_KEY).unwrap(), None);
    store.set(PASSWORD_KEY, "abc123").unwrap();
    store.set(PASSWORD_KEY, "xyz789").unwrap();
    store.set(TODOS_KEY, "[]").unwrap();

    assert_eq!(store.get(PASSWORD_KEY).unwrap().as_deref(), Some("xyz789"));
    assert_eq!(
        store.keys().unwrap(),
        vec![PASSWORD_KEY.to_string(), TODOS_KEY.to_string()]
    );

    store.remove(PASSWORD_KEY).unwrap();
    store.remove(PASSWORD_KEY).unwrap();
    assert_eq!(store.get(PASSWORD_KEY).unwrap(), None);
    assert_eq!(store.keys().unwrap(), vec![TODOS_KEY.to_string()]);
}

#[test]
fn values_survive_reopening_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("offline_todo.sqlite3");

    {
        let conn = open_db(&path).unwrap();
        let store = SqliteKvStore::new(&conn);
        store.set(TODOS_KEY, r#"[{"id":1,"text":"a","completed":false}]"#)
            .unwrap();
    }

    let conn = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn), latest_version());
    let store = SqliteKvStore::new(&conn);
    assert_eq!(
        store.get(TODOS_KEY).unwrap().as_deref(),
        Some(r#"[{"id":1,"text":"a","completed":false}]"#)
    );
}

#[test]
fn try_new_rejects_unmigrated_connection() {
    let conn = Connection::open_in_memory().unwrap();
    let err = SqliteKvStore::try_new(&conn).err().unwrap();
    assert!(matches!(err, KvError::Unavailable(_)));
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");

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

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}
