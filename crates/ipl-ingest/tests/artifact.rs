//! Integration tests for staged artifact I/O.

use std::fs;

use ipl_ingest::{ArtifactError, read_artifact, render_artifact, write_artifact};
use polars::prelude::*;
use proptest::prelude::*;
use tempfile::tempdir;

fn empty_batting() -> DataFrame {
    df! {
        "player" => Vec::<String>::new(),
        "runs" => Vec::<i64>::new(),
        "balls" => Vec::<i64>::new(),
        "strike_rate" => Vec::<f64>::new(),
    }
    .expect("frame")
}

#[test]
fn round_trip_preserves_rows_columns_and_values() {
    let df = df! {
        "player" => ["A", "de Villiers, AB"],
        "runs" => [30i64, 45],
        "balls" => [Some(20i64), None],
        "strike_rate" => [150.0f64, 150.0],
    }
    .expect("frame");
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("transformed_data.csv");

    let info = write_artifact(&df, &path).expect("write artifact");
    let read = read_artifact(&path).expect("read artifact");

    assert_eq!(info.rows, 2);
    assert!(read.equals_missing(&df));
    assert_eq!(read.schema(), df.schema());
}

#[test]
fn header_only_artifact_reads_as_empty_frame() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("empty.csv");
    write_artifact(&empty_batting(), &path).expect("write artifact");

    assert_eq!(
        fs::read_to_string(&path).expect("read file"),
        "player,runs,balls,strike_rate\n"
    );
    let read = read_artifact(&path).expect("read artifact");
    assert_eq!(read.height(), 0);
    assert_eq!(
        read.get_column_names_str(),
        vec!["player", "runs", "balls", "strike_rate"]
    );
}

#[test]
fn rewriting_replaces_previous_artifact() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("extracted_data.csv");
    fs::write(&path, "stale,content\n1,2\n3,4\n").expect("seed stale file");

    write_artifact(&empty_batting(), &path).expect("write artifact");

    let read = read_artifact(&path).expect("read");
    assert_eq!(read.height(), 0);
    assert_eq!(read.width(), 4);
}

#[test]
fn empty_artifact_is_malformed() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("broken.csv");
    fs::write(&path, "").expect("write");

    let err = read_artifact(&path).unwrap_err();
    assert!(matches!(err, ArtifactError::Malformed { .. }));
}

proptest! {
    #[test]
    fn round_trip_any_batting_rows(
        rows in prop::collection::vec(
            ("[A-Z][a-z]{2,8} [A-Z]", 0i64..10_000, 1i64..10_000, -1.0e6f64..1.0e6),
            1..20,
        )
    ) {
        let (players, rest): (Vec<String>, Vec<(i64, i64, f64)>) = rows
            .into_iter()
            .map(|(player, runs, balls, rate)| (player, (runs, balls, rate)))
            .unzip();
        let df = df! {
            "player" => players,
            "runs" => rest.iter().map(|r| r.0).collect::<Vec<_>>(),
            "balls" => rest.iter().map(|r| r.1).collect::<Vec<_>>(),
            "strike_rate" => rest.iter().map(|r| r.2).collect::<Vec<_>>(),
        }
        .expect("frame");
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("artifact.csv");

        write_artifact(&df, &path).expect("write artifact");
        let read = read_artifact(&path).expect("read artifact");

        prop_assert!(read.equals_missing(&df));
    }

    #[test]
    fn rendering_is_deterministic(runs in prop::collection::vec(0i64..500, 0..30)) {
        let df = df! { "runs" => runs }.expect("frame");
        prop_assert_eq!(
            render_artifact(&df).expect("render"),
            render_artifact(&df).expect("render")
        );
    }
}
