use std::fmt;

use polars::prelude::{AnyValue, DataFrame, DataType};

use crate::error::{ModelError, Result};

/// Storage class of a frame column, coarse enough to compare against a
/// SQL declared type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    Integer,
    Float,
    Boolean,
    Text,
}

impl ColumnType {
    /// Classify a polars dtype. Anything that is not numeric or boolean
    /// is stored as text.
    pub fn of(dtype: &DataType) -> Self {
        if dtype.is_integer() {
            ColumnType::Integer
        } else if dtype.is_float() {
            ColumnType::Float
        } else if matches!(dtype, DataType::Boolean) {
            ColumnType::Boolean
        } else {
            ColumnType::Text
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Integer => "integer",
            ColumnType::Float => "float",
            ColumnType::Boolean => "boolean",
            ColumnType::Text => "text",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Name, type and fill of one column, read from the frame schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnProfile {
    pub name: String,
    pub column_type: ColumnType,
    /// Non-null cells.
    pub values: usize,
}

impl ColumnProfile {
    pub fn has_values(&self) -> bool {
        self.values > 0
    }
}

/// Profile every column of `df` in schema order.
pub fn profile(df: &DataFrame) -> Vec<ColumnProfile> {
    df.schema()
        .iter()
        .zip(df.get_columns())
        .map(|((name, dtype), column)| ColumnProfile {
            name: name.to_string(),
            column_type: ColumnType::of(dtype),
            values: column.len() - column.null_count(),
        })
        .collect()
}

/// Reject frames whose header has a blank column name.
pub fn validate_headers(df: &DataFrame) -> Result<()> {
    for (index, name) in df.get_column_names().into_iter().enumerate() {
        if name.trim().is_empty() {
            return Err(ModelError::EmptyColumnName { index });
        }
    }
    Ok(())
}

/// Render a cell for display. Null is empty; floats keep a decimal point.
pub fn cell_text(value: AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        AnyValue::Float64(v) => format!("{v:?}"),
        AnyValue::Float32(v) => format!("{v:?}"),
        other => other.to_string(),
    }
}
