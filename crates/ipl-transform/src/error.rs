use ipl_model::ColumnType;
use polars::prelude::PolarsError;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum TransformError {
    #[error("missing required column '{column}'")]
    MissingColumn { column: String },

    #[error("column '{column}' must be {expected}, found {found}")]
    ColumnType {
        column: String,
        expected: ColumnType,
        found: ColumnType,
    },

    /// A row that cannot be reconciled with the output schema.
    #[error("row {row}, column '{column}': {reason}")]
    InvalidRow {
        row: usize,
        column: String,
        reason: String,
    },

    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<PolarsError> for TransformError {
    fn from(err: PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TransformError>;
