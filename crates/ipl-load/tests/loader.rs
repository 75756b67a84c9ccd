//! Integration tests for the SQLite loader.

use std::fs;
use std::path::Path;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use ipl_load::{LoadError, LoadMode, Loader};
use rusqlite::Connection;
use tempfile::tempdir;

const TRANSFORMED: &str = "player,runs,balls,strike_rate\nA,30,20,150.0\nC,45,30,150.0\n";

fn write(path: &Path, contents: &str) {
    fs::write(path, contents).expect("write artifact");
}

fn rows(database: &Path, table: &str) -> Vec<(String, i64, f64)> {
    let conn = Connection::open(database).expect("open db");
    let mut stmt = conn
        .prepare(&format!(
            "SELECT player, runs, strike_rate FROM \"{table}\" ORDER BY rowid"
        ))
        .expect("prepare");
    stmt.query_map([], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, i64>(1)?,
            row.get::<_, f64>(2)?,
        ))
    })
    .expect("query")
    .collect::<Result<Vec<_>, _>>()
    .expect("rows")
}

fn count(database: &Path, table: &str) -> i64 {
    let conn = Connection::open(database).expect("open db");
    conn.query_row(&format!("SELECT COUNT(*) FROM \"{table}\""), [], |row| {
        row.get::<_, i64>(0)
    })
    .expect("count")
}

#[test]
fn creates_table_and_inserts_all_rows() {
    let dir = tempdir().expect("temp dir");
    let artifact = dir.path().join("transformed_data.csv");
    let database = dir.path().join("db").join("ipl.db");
    write(&artifact, TRANSFORMED);

    let summary = Loader::new(&database, "batting")
        .load(&artifact)
        .expect("load");

    assert!(summary.table_created);
    assert_eq!(summary.rows_written, 2);
    assert_eq!(
        rows(&database, "batting"),
        vec![
            ("A".to_string(), 30, 150.0),
            ("C".to_string(), 45, 150.0)
        ]
    );
}

#[test]
fn empty_artifact_creates_empty_table() {
    let dir = tempdir().expect("temp dir");
    let artifact = dir.path().join("transformed_data.csv");
    let database = dir.path().join("ipl.db");
    write(&artifact, "player,runs,balls,strike_rate\n");

    let summary = Loader::new(&database, "batting")
        .load(&artifact)
        .expect("load");

    assert!(summary.table_created);
    assert_eq!(summary.rows_written, 0);
    assert_eq!(count(&database, "batting"), 0);

    // A later non-empty run still fits the untyped columns.
    write(&artifact, TRANSFORMED);
    Loader::new(&database, "batting")
        .load(&artifact)
        .expect("second load");
    assert_eq!(count(&database, "batting"), 2);
}

#[test]
fn replace_mode_makes_reruns_idempotent() {
    let dir = tempdir().expect("temp dir");
    let artifact = dir.path().join("transformed_data.csv");
    let database = dir.path().join("ipl.db");
    write(&artifact, TRANSFORMED);
    let loader = Loader::new(&database, "batting");

    loader.load(&artifact).expect("first load");
    let summary = loader.load(&artifact).expect("second load");

    assert_eq!(summary.rows_replaced, 2);
    assert_eq!(count(&database, "batting"), 2);
}

#[test]
fn append_mode_keeps_previous_rows() {
    let dir = tempdir().expect("temp dir");
    let artifact = dir.path().join("transformed_data.csv");
    let database = dir.path().join("ipl.db");
    write(&artifact, TRANSFORMED);
    let loader = Loader::new(&database, "batting").with_mode(LoadMode::Append);

    loader.load(&artifact).expect("first load");
    loader.load(&artifact).expect("second load");

    assert_eq!(count(&database, "batting"), 4);
}

#[test]
fn incompatible_columns_are_schema_drift() {
    let dir = tempdir().expect("temp dir");
    let artifact = dir.path().join("transformed_data.csv");
    let database = dir.path().join("ipl.db");
    write(&artifact, TRANSFORMED);
    let loader = Loader::new(&database, "batting");
    loader.load(&artifact).expect("first load");

    write(&artifact, "player,runs,strike_rate\nA,30,150.0\n");
    let err = loader.load(&artifact).unwrap_err();
    assert!(matches!(err, LoadError::SchemaDrift { ref table, .. } if table == "batting"));

    write(
        &artifact,
        "player,runs,balls,strike_rate\nA,thirty,20,150.0\n",
    );
    let err = loader.load(&artifact).unwrap_err();
    assert!(matches!(err, LoadError::SchemaDrift { .. }));

    // Nothing from the rejected runs is visible.
    assert_eq!(count(&database, "batting"), 2);
}

#[test]
fn failure_mid_load_leaves_previous_contents_visible() {
    let dir = tempdir().expect("temp dir");
    let artifact = dir.path().join("transformed_data.csv");
    let database = dir.path().join("ipl.db");
    {
        let conn = Connection::open(&database).expect("open db");
        conn.execute_batch(
            "CREATE TABLE batting (player TEXT NOT NULL, runs INTEGER, balls INTEGER, strike_rate REAL);
             INSERT INTO batting VALUES ('OLD', 1, 1, 100.0);",
        )
        .expect("seed table");
    }
    // Third record violates NOT NULL after two successful inserts.
    write(
        &artifact,
        "player,runs,balls,strike_rate\nA,30,20,150.0\nC,45,30,150.0\n,10,5,200.0\n",
    );

    let err = Loader::new(&database, "batting")
        .load(&artifact)
        .unwrap_err();

    assert!(matches!(
        err,
        LoadError::StorageUnavailable {
            operation: "insert row",
            ..
        }
    ));
    assert_eq!(
        rows(&database, "batting"),
        vec![("OLD".to_string(), 1, 100.0)]
    );
}

#[test]
fn waits_for_concurrent_writer_then_commits() {
    let dir = tempdir().expect("temp dir");
    let artifact = dir.path().join("transformed_data.csv");
    let database = dir.path().join("ipl.db");
    write(&artifact, TRANSFORMED);
    let loader = Loader::new(&database, "batting");
    loader.load(&artifact).expect("first load");

    let (locked_tx, locked_rx) = mpsc::channel();
    let writer_db = database.clone();
    let writer = thread::spawn(move || {
        let conn = Connection::open(&writer_db).expect("open db");
        conn.execute_batch(
            "BEGIN IMMEDIATE; INSERT INTO batting VALUES ('W', 1, 1, 100.0);",
        )
        .expect("take write lock");
        locked_tx.send(()).expect("signal lock");
        thread::sleep(Duration::from_millis(300));
        conn.execute_batch("COMMIT").expect("release lock");
    });
    locked_rx.recv().expect("writer holds lock");

    let summary = loader.load(&artifact).expect("load after lock is released");
    writer.join().expect("writer thread");

    // The load started after the writer committed, so it replaced its row too.
    assert_eq!(summary.rows_replaced, 3);
    assert_eq!(count(&database, "batting"), 2);
}

#[test]
fn unreadable_artifact_is_reported() {
    let dir = tempdir().expect("temp dir");
    let err = Loader::new(dir.path().join("ipl.db"), "batting")
        .load(&dir.path().join("missing.csv"))
        .unwrap_err();
    assert!(matches!(err, LoadError::Artifact(_)));
}

#[test]
fn unopenable_database_is_storage_unavailable() {
    let dir = tempdir().expect("temp dir");
    let artifact = dir.path().join("transformed_data.csv");
    write(&artifact, TRANSFORMED);
    // A directory cannot be opened as a database file.
    let err = Loader::new(dir.path(), "batting")
        .load(&artifact)
        .unwrap_err();
    assert!(matches!(err, LoadError::StorageUnavailable { .. }));
}
