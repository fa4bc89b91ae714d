//! End-to-end engine tests against temporary database files.
//!
//! Uses file-backed temp directories because the engine opens a fresh
//! connection per call — an in-memory database would vanish between
//! calls.

use ember_core::errors::QueryEngineError;
use ember_db::{DatabaseManager, QueryOutput};
use rusqlite::types::Value;
use tempfile::TempDir;

fn temp_manager() -> (TempDir, DatabaseManager) {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("test.db");
    // The engine refuses paths that do not exist yet; SQLite is happy to
    // treat a zero-byte file as an empty database.
    std::fs::File::create(&db_path).unwrap();
    (dir, DatabaseManager::with_database(db_path))
}

#[test]
fn create_insert_select_round_trip() {
    let (_dir, manager) = temp_manager();

    let created = manager
        .execute("CREATE TABLE t (id INTEGER, name TEXT)", &[])
        .unwrap();
    assert!(matches!(created, QueryOutput::Affected { .. }));

    let inserted = manager
        .execute("INSERT INTO t VALUES (1, 'Alice')", &[])
        .unwrap();
    assert_eq!(inserted, QueryOutput::Affected { affected: 1 });

    let selected = manager.execute("SELECT * FROM t", &[]).unwrap();
    let QueryOutput::Rows {
        columns,
        rows,
        count,
    } = selected
    else {
        panic!("expected a row set");
    };
    assert_eq!(columns, vec!["id", "name"]);
    assert_eq!(count, 1);
    assert_eq!(
        rows,
        vec![vec![Value::Integer(1), Value::Text("Alice".into())]]
    );
}

#[test]
fn bound_parameters_are_never_interpolated() {
    let (_dir, manager) = temp_manager();
    manager
        .execute("CREATE TABLE t (id INTEGER, name TEXT)", &[])
        .unwrap();
    manager
        .execute(
            "INSERT INTO t VALUES (?1, ?2)",
            &[
                Value::Integer(7),
                Value::Text("O'Brien; DROP TABLE t".into()),
            ],
        )
        .unwrap();

    let out = manager
        .execute("SELECT name FROM t WHERE id = ?1", &[Value::Integer(7)])
        .unwrap();
    let QueryOutput::Rows { rows, .. } = out else {
        panic!("expected rows");
    };
    assert_eq!(rows[0][0], Value::Text("O'Brien; DROP TABLE t".into()));

    // The hostile text landed as data, not as SQL.
    assert_eq!(manager.list_tables().unwrap(), vec!["t"]);
}

#[test]
fn read_only_mode_blocks_writes_but_not_reads() {
    let (_dir, mut manager) = temp_manager();
    manager.execute("CREATE TABLE t (id INTEGER)", &[]).unwrap();
    manager.execute("INSERT INTO t VALUES (1)", &[]).unwrap();

    manager.set_read_only(true);
    let err = manager
        .execute("INSERT INTO t VALUES (2)", &[])
        .unwrap_err();
    assert!(matches!(err, QueryEngineError::ReadOnly));

    // The blocked write must not have touched the table.
    let out = manager.execute("SELECT * FROM t", &[]).unwrap();
    let QueryOutput::Rows { count, .. } = out else {
        panic!("expected rows");
    };
    assert_eq!(count, 1);
}

#[test]
fn read_only_mode_sees_through_adversarial_formatting() {
    let (_dir, mut manager) = temp_manager();
    manager.execute("CREATE TABLE t (id INTEGER)", &[]).unwrap();
    manager.set_read_only(true);

    let err = manager
        .execute(";;; INSERT INTO t VALUES (9)", &[])
        .unwrap_err();
    assert!(matches!(err, QueryEngineError::ReadOnly));

    let err = manager
        .execute("/* just a read, honest */ DELETE FROM t", &[])
        .unwrap_err();
    assert!(matches!(err, QueryEngineError::ReadOnly));

    assert!(manager.execute("/* c */ SELECT * FROM t", &[]).is_ok());
}

#[test]
fn failed_statement_leaves_prior_state_intact() {
    let (_dir, manager) = temp_manager();
    manager
        .execute("CREATE TABLE t (id INTEGER PRIMARY KEY)", &[])
        .unwrap();
    manager.execute("INSERT INTO t VALUES (1)", &[]).unwrap();

    // The second row collides with the existing primary key: the whole
    // statement fails and nothing from it may persist.
    let err = manager
        .execute("INSERT INTO t VALUES (2), (1)", &[])
        .unwrap_err();
    assert!(matches!(err, QueryEngineError::Sql { .. }));

    let out = manager.execute("SELECT id FROM t ORDER BY id", &[]).unwrap();
    let QueryOutput::Rows { rows, .. } = out else {
        panic!("expected rows");
    };
    assert_eq!(rows, vec![vec![Value::Integer(1)]]);
}

#[test]
fn unconfigured_manager_refuses_queries() {
    let manager = DatabaseManager::new();
    let err = manager.execute("SELECT 1", &[]).unwrap_err();
    assert!(matches!(err, QueryEngineError::NoDatabase));
}

#[test]
fn empty_path_counts_as_unconfigured() {
    let mut manager = DatabaseManager::new();
    manager.set_database("");
    let err = manager.execute("SELECT 1", &[]).unwrap_err();
    assert!(matches!(err, QueryEngineError::NoDatabase));
}

#[test]
fn missing_database_file_is_reported() {
    let dir = TempDir::new().unwrap();
    let manager = DatabaseManager::with_database(dir.path().join("absent.db"));
    let err = manager.execute("SELECT 1", &[]).unwrap_err();
    assert!(matches!(err, QueryEngineError::DatabaseNotFound { .. }));
}

#[test]
fn engine_diagnostics_pass_through() {
    let (_dir, manager) = temp_manager();
    let err = manager.execute("SELEKT 1", &[]).unwrap_err();
    let QueryEngineError::Sql { message } = err else {
        panic!("expected an SQL error");
    };
    assert!(
        message.contains("syntax error"),
        "unexpected diagnostic: {message}"
    );
}

#[test]
fn tables_list_in_lexicographic_order() {
    let (_dir, manager) = temp_manager();
    for name in ["zebra", "alpha", "midway"] {
        manager
            .execute(&format!("CREATE TABLE {name} (id INTEGER)"), &[])
            .unwrap();
    }
    assert_eq!(
        manager.list_tables().unwrap(),
        vec!["alpha", "midway", "zebra"]
    );
}

#[test]
fn pragma_statements_execute_as_reads() {
    let (_dir, manager) = temp_manager();
    manager.execute("CREATE TABLE t (id INTEGER)", &[]).unwrap();
    let out = manager.execute("PRAGMA table_info(t)", &[]).unwrap();
    assert!(matches!(out, QueryOutput::Rows { .. }));
}

#[test]
fn table_info_maps_column_metadata() {
    let (_dir, manager) = temp_manager();
    manager
        .execute(
            "CREATE TABLE people (id INTEGER PRIMARY KEY, name TEXT NOT NULL, note TEXT)",
            &[],
        )
        .unwrap();

    let columns = manager.table_info("people");
    assert_eq!(columns.len(), 3);

    assert_eq!(columns[0].name, "id");
    assert_eq!(columns[0].declared_type, "INTEGER");
    assert!(columns[0].is_primary_key);

    assert_eq!(columns[1].name, "name");
    assert!(!columns[1].nullable);
    assert!(!columns[1].is_primary_key);

    assert_eq!(columns[2].name, "note");
    assert!(columns[2].nullable);
}

#[test]
fn table_info_is_best_effort_for_bad_names() {
    let (_dir, manager) = temp_manager();
    assert!(manager.table_info("users; DROP TABLE users").is_empty());
    assert!(manager.table_info("").is_empty());
    // Unknown but well-formed names are also just empty.
    assert!(manager.table_info("no_such_table").is_empty());
}

#[test]
fn checked_lookup_rejects_invalid_identifiers() {
    let (_dir, manager) = temp_manager();
    let err = manager.table_info_checked("bad-name").unwrap_err();
    assert!(matches!(err, QueryEngineError::InvalidIdentifier { .. }));
}

#[test]
fn no_connection_state_survives_between_calls() {
    let (_dir, manager) = temp_manager();
    manager.execute("CREATE TABLE t (id INTEGER)", &[]).unwrap();

    // A second manager pointed at the same file sees every commit
    // immediately, because no handle is ever cached.
    let second = DatabaseManager::with_database(manager.database().unwrap());
    manager.execute("INSERT INTO t VALUES (1)", &[]).unwrap();
    let out = second.execute("SELECT * FROM t", &[]).unwrap();
    let QueryOutput::Rows { count, .. } = out else {
        panic!("expected rows");
    };
    assert_eq!(count, 1);
}
