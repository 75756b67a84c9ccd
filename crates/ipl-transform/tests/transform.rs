//! Integration tests for the batting transform.

use ipl_ingest::read_csv_bytes;
use ipl_model::ColumnType;
use ipl_transform::{InvalidRowPolicy, TransformError, TransformOptions, transform};
use polars::prelude::*;
use proptest::prelude::*;

fn csv(text: &str) -> DataFrame {
    read_csv_bytes(text.as_bytes().to_vec()).expect("valid csv")
}

fn drop_invalid() -> TransformOptions {
    TransformOptions::default().with_invalid_row_policy(InvalidRowPolicy::Drop)
}

fn floats(df: &DataFrame, name: &str) -> Vec<Option<f64>> {
    df.column(name)
        .expect("column")
        .f64()
        .expect("float column")
        .into_iter()
        .collect()
}

#[test]
fn drops_zero_ball_rows_and_derives_strike_rate() {
    let input = csv("player,runs,balls\nA,30,20\nB,0,0\nC,45,30\n");

    let output = transform(&input, &TransformOptions::default()).expect("transform");

    let expected = df! {
        "player" => ["A", "C"],
        "runs" => [30i64, 45],
        "balls" => [20i64, 30],
        "strike_rate" => [150.0f64, 150.0],
    }
    .expect("frame");
    assert!(output.frame.equals_missing(&expected));
    assert_eq!(output.dropped_zero_balls, 1);
    assert_eq!(output.dropped_invalid, 0);
}

#[test]
fn missing_balls_column_fails() {
    let input = csv("player,runs\nA,30\n");

    let err = transform(&input, &TransformOptions::default()).unwrap_err();

    assert_eq!(
        err,
        TransformError::MissingColumn {
            column: "balls".to_string()
        }
    );
}

#[test]
fn float_runs_column_is_a_type_error() {
    let input = csv("player,runs,balls\nA,30.5,20\n");

    let err = transform(&input, &TransformOptions::default()).unwrap_err();

    assert_eq!(
        err,
        TransformError::ColumnType {
            column: "runs".to_string(),
            expected: ColumnType::Integer,
            found: ColumnType::Float,
        }
    );
}

#[test]
fn non_integer_cell_aborts_batch_by_default() {
    let input = csv("player,runs,balls\nA,30,20\nB,45*,30\nC,12,6\n");

    let err = transform(&input, &TransformOptions::default()).unwrap_err();

    assert_eq!(
        err,
        TransformError::InvalidRow {
            row: 2,
            column: "runs".to_string(),
            reason: "not an integer: 45*".to_string(),
        }
    );
}

#[test]
fn non_integer_cell_is_dropped_under_drop_policy() {
    let input = csv("player,runs,balls\nA,30,20\nB,45*,30\nC,12,6\n");

    let output = transform(&input, &drop_invalid()).expect("transform");

    assert_eq!(output.frame.height(), 2);
    assert_eq!(output.dropped_invalid, 1);
    assert_eq!(output.frame.column("runs").expect("runs").dtype(), &DataType::Int64);
    assert_eq!(
        floats(&output.frame, "strike_rate"),
        vec![Some(150.0), Some(200.0)]
    );
}

#[test]
fn missing_cell_aborts_batch_by_default() {
    let input = csv("player,runs,balls\nA,30,20\nB,,4\n");

    let err = transform(&input, &TransformOptions::default()).unwrap_err();

    assert_eq!(
        err,
        TransformError::InvalidRow {
            row: 2,
            column: "runs".to_string(),
            reason: "missing value".to_string(),
        }
    );
}

#[test]
fn blank_player_and_negative_runs_are_dropped() {
    let input = csv("player,runs,balls\nA,30,20\n  ,12,6\nC,-1,5\nD,9,6\n");

    let output = transform(&input, &drop_invalid()).expect("transform");

    assert_eq!(output.frame.height(), 2);
    assert_eq!(output.dropped_invalid, 2);
    assert_eq!(
        floats(&output.frame, "strike_rate"),
        vec![Some(150.0), Some(150.0)]
    );
}

#[test]
fn extra_columns_pass_through_and_strike_rate_is_recomputed() {
    let input = csv("player,team,runs,balls,strike_rate\n V Kohli ,RCB,73,50,1.0\n");

    let output = transform(&input, &TransformOptions::default()).expect("transform");

    assert_eq!(
        output.frame.get_column_names_str(),
        vec!["player", "team", "runs", "balls", "strike_rate"]
    );
    let player = output.frame.column("player").expect("player").get(0).expect("cell");
    assert_eq!(player, AnyValue::String("V Kohli"));
    assert_eq!(floats(&output.frame, "strike_rate"), vec![Some(146.0)]);
}

#[test]
fn empty_input_yields_typed_empty_output() {
    // A header-only extract reads every column as text.
    let input = csv("player,runs,balls\n");

    let output = transform(&input, &TransformOptions::default()).expect("transform");

    assert_eq!(output.frame.height(), 0);
    assert_eq!(
        output.frame.column("strike_rate").expect("strike_rate").dtype(),
        &DataType::Float64
    );
}

proptest! {
    #[test]
    fn transform_is_deterministic(
        rows in prop::collection::vec(("[A-Z][a-z]{1,6}", 0i64..200, 0i64..120), 0..40)
    ) {
        let mut text = String::from("player,runs,balls\n");
        for (player, runs, balls) in &rows {
            text.push_str(&format!("{player},{runs},{balls}\n"));
        }
        let input = csv(&text);
        let options = TransformOptions::default();

        let first = transform(&input, &options).expect("transform");
        let second = transform(&input, &options).expect("transform");

        prop_assert!(first.frame.equals_missing(&second.frame));
        let balls = first.frame.column("balls").expect("balls").i64().expect("ints");
        prop_assert!(balls.into_iter().all(|b| b != Some(0)));
        prop_assert_eq!(
            first.frame.height() + first.dropped_zero_balls,
            rows.len()
        );
    }
}
