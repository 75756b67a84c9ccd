//! Strike-rate transform over raw batting records.
//!
//! Per input row, in order:
//! 1. `player` must be non-blank (it is trimmed).
//! 2. `runs` and `balls` must be present non-negative integers. Each cell is
//!    checked on its own, so one bad cell in a text column only affects its
//!    row.
//! 3. Rows with `balls == 0` are dropped.
//! 4. `strike_rate = runs / balls * 100`, rounded half up to two decimals, is
//!    appended (or recomputed in place when the input already has it).
//!
//! Other columns pass through untouched.

use ipl_model::ColumnType;
use ipl_model::batting::{BALLS, PLAYER, REQUIRED_COLUMNS, RUNS, STRIKE_RATE};
use polars::prelude::*;
use tracing::{debug, warn};

use crate::error::{Result, TransformError};
use crate::options::{InvalidRowPolicy, TransformOptions};

#[derive(Debug, Clone)]
pub struct TransformOutput {
    pub frame: DataFrame,
    /// Rows filtered out because the batter faced no balls.
    pub dropped_zero_balls: usize,
    /// Rows dropped under [`InvalidRowPolicy::Drop`].
    pub dropped_invalid: usize,
}

/// Runs per hundred balls, rounded half up to two decimals.
///
/// Same arithmetic as [`strike_rate_expr`].
pub fn strike_rate(runs: i64, balls: i64) -> f64 {
    let scaled = runs as f64 / balls as f64 * 10_000.0 + 0.5;
    (scaled as i64) as f64 / 100.0
}

/// Column expression for [`strike_rate`]. Inputs are non-negative, so the
/// integer cast floors.
pub fn strike_rate_expr() -> Expr {
    ((col(RUNS).cast(DataType::Float64) / col(BALLS).cast(DataType::Float64)
        * lit(10_000.0)
        + lit(0.5))
    .cast(DataType::Int64)
    .cast(DataType::Float64)
        / lit(100.0))
    .alias(STRIKE_RATE)
}

/// Required columns exist; `runs`/`balls` are integer, or text to be parsed
/// per cell.
fn assert_schema(input: &DataFrame) -> Result<()> {
    let schema = input.schema();
    for column in REQUIRED_COLUMNS {
        let Some(dtype) = schema.get(column) else {
            return Err(TransformError::MissingColumn {
                column: column.to_string(),
            });
        };
        if column == PLAYER {
            continue;
        }
        match ColumnType::of(dtype) {
            ColumnType::Integer | ColumnType::Text => {}
            found => {
                return Err(TransformError::ColumnType {
                    column: column.to_string(),
                    expected: ColumnType::Integer,
                    found,
                });
            }
        }
    }
    Ok(())
}

fn invalid(row: usize, column: &str, reason: impl Into<String>) -> TransformError {
    TransformError::InvalidRow {
        row,
        column: column.to_string(),
        reason: reason.into(),
    }
}

fn parse_count(text: &str, row: usize, column: &str) -> Result<i64> {
    let text = text.trim();
    if text.is_empty() {
        return Err(invalid(row, column, "missing value"));
    }
    text.parse()
        .map_err(|_| invalid(row, column, format!("not an integer: {text}")))
}

fn count(value: AnyValue<'_>, row: usize, column: &str) -> Result<i64> {
    let n = match value {
        AnyValue::Null => return Err(invalid(row, column, "missing value")),
        AnyValue::Int64(n) => n,
        AnyValue::Int32(n) => i64::from(n),
        AnyValue::UInt32(n) => i64::from(n),
        AnyValue::UInt64(n) => i64::try_from(n)
            .map_err(|_| invalid(row, column, format!("out of range: {n}")))?,
        AnyValue::String(text) => parse_count(text, row, column)?,
        AnyValue::StringOwned(ref text) => parse_count(text.as_str(), row, column)?,
        other => return Err(invalid(row, column, format!("not an integer: {other}"))),
    };
    if n < 0 {
        return Err(invalid(row, column, format!("negative value {n}")));
    }
    Ok(n)
}

fn player_name(value: Option<&str>, row: usize) -> Result<String> {
    match value.map(str::trim) {
        Some(name) if !name.is_empty() => Ok(name.to_string()),
        _ => Err(invalid(row, PLAYER, "missing player name")),
    }
}

/// Clean the raw batting frame and derive `strike_rate`.
///
/// # Errors
///
/// - [`TransformError::MissingColumn`] if `player`, `runs` or `balls` is absent.
/// - [`TransformError::ColumnType`] if `runs`/`balls` are neither integer nor
///   text (a float or boolean column).
/// - [`TransformError::InvalidRow`] for the first bad row under
///   [`InvalidRowPolicy::Abort`].
pub fn transform(input: &DataFrame, options: &TransformOptions) -> Result<TransformOutput> {
    assert_schema(input)?;

    let players = input.column(PLAYER)?.cast(&DataType::String)?;
    let players = players.str()?;
    let runs_column = input.column(RUNS)?;
    let balls_column = input.column(BALLS)?;

    let height = input.height();
    let mut names: Vec<String> = Vec::with_capacity(height);
    let mut runs: Vec<i64> = Vec::with_capacity(height);
    let mut balls: Vec<i64> = Vec::with_capacity(height);
    let mut keep: Vec<bool> = Vec::with_capacity(height);
    let mut dropped_invalid = 0usize;

    for idx in 0..height {
        let row = idx + 1;
        let checked = player_name(players.get(idx), row).and_then(|name| {
            Ok((
                name,
                count(runs_column.get(idx)?, row, RUNS)?,
                count(balls_column.get(idx)?, row, BALLS)?,
            ))
        });
        match checked {
            Ok((name, row_runs, row_balls)) => {
                names.push(name);
                runs.push(row_runs);
                balls.push(row_balls);
                keep.push(true);
            }
            Err(err) => match options.on_invalid_row {
                InvalidRowPolicy::Abort => return Err(err),
                InvalidRowPolicy::Drop => {
                    warn!(error = %err, "dropping invalid row");
                    dropped_invalid += 1;
                    names.push(String::new());
                    runs.push(0);
                    balls.push(0);
                    keep.push(false);
                }
            },
        }
    }

    let mut frame = input.clone();
    frame.with_column(Series::new(PLAYER.into(), names))?;
    frame.with_column(Series::new(RUNS.into(), runs))?;
    frame.with_column(Series::new(BALLS.into(), balls))?;
    if dropped_invalid > 0 {
        let mask = BooleanChunked::from_slice("valid".into(), &keep);
        frame = frame.filter(&mask)?;
    }
    let valid_rows = frame.height();

    let frame = frame
        .lazy()
        .filter(col(BALLS).neq(lit(0)))
        .with_column(strike_rate_expr())
        .collect()?;
    let dropped_zero_balls = valid_rows - frame.height();

    debug!(
        input_rows = height,
        output_rows = frame.height(),
        dropped_zero_balls,
        dropped_invalid,
        "transform complete"
    );
    Ok(TransformOutput {
        frame,
        dropped_zero_balls,
        dropped_invalid,
    })
}
