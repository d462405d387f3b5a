use rusqlite::Connection;
use tabla_core::db::migrations::latest_version;
use tabla_core::db::{open_db, open_db_in_memory, DbError};
use tabla_core::{RepoError, Session, SessionRepository, SqliteSessionRepository};

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "session");
}

#[test]
fn session_survives_reopening_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tabla_notes.sqlite3");

    let conn_first = open_db(&path).unwrap();
    SqliteSessionRepository::new(&conn_first)
        .save(&Session::new("ravi", "token-1"))
        .unwrap();
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    let restored = SqliteSessionRepository::new(&conn_second).load().unwrap();
    assert_eq!(restored, Some(Session::new("ravi", "token-1")));
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

#[test]
fn unopenable_session_file_reports_its_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("tabla_notes.sqlite3");

    let err = open_db(&path).unwrap_err();
    match &err {
        DbError::Open { path: reported, .. } => assert_eq!(reported, &path),
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().contains("tabla_notes.sqlite3"));
}

#[test]
fn save_replaces_the_single_stored_session() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSessionRepository::new(&conn);

    assert_eq!(repo.load().unwrap(), None);
    repo.save(&Session::new("ravi", "token-1")).unwrap();
    repo.save(&Session::new("meera", "token-2")).unwrap();

    assert_eq!(repo.load().unwrap(), Some(Session::new("meera", "token-2")));
    let rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM session;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 1);
}

#[test]
fn clear_is_idempotent() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSessionRepository::new(&conn);

    repo.save(&Session::new("ravi", "token-1")).unwrap();
    repo.clear().unwrap();
    repo.clear().unwrap();
    assert_eq!(repo.load().unwrap(), None);
}

#[test]
fn blank_stored_token_is_invalid_data() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO session (id, username, token) VALUES (1, 'ravi', '  ');",
        [],
    )
    .unwrap();

    let err = SqliteSessionRepository::new(&conn).load().unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1);",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "missing table `{table_name}`");
}
