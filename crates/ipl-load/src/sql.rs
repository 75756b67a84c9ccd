//! SQL text and type mapping helpers.

use ipl_model::{ColumnProfile, ColumnType, cell_text};
use polars::prelude::AnyValue;
use rusqlite::Connection;
use rusqlite::types::Value as SqlValue;

pub(crate) fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

pub(crate) fn declared_type(column_type: ColumnType) -> &'static str {
    match column_type {
        ColumnType::Integer => "INTEGER",
        ColumnType::Float => "REAL",
        ColumnType::Boolean => "BOOLEAN",
        ColumnType::Text => "TEXT",
    }
}

/// Type affinity of a declared column type, following SQLite's rules.
/// `None` means the column accepts any type.
pub(crate) fn affinity(declared: &str) -> Option<ColumnType> {
    let declared = declared.to_ascii_uppercase();
    if declared.contains("INT") {
        Some(ColumnType::Integer)
    } else if ["CHAR", "CLOB", "TEXT"].iter().any(|t| declared.contains(t)) {
        Some(ColumnType::Text)
    } else if ["REAL", "FLOA", "DOUB"].iter().any(|t| declared.contains(t)) {
        Some(ColumnType::Float)
    } else {
        None
    }
}

/// Column definitions for a new table. Columns without any values are left
/// untyped so a later, non-empty run still fits.
pub(crate) fn create_table_sql(table: &str, columns: &[ColumnProfile]) -> String {
    let definitions: Vec<String> = columns
        .iter()
        .map(|column| {
            if column.has_values() {
                format!(
                    "{} {}",
                    quote_ident(&column.name),
                    declared_type(column.column_type)
                )
            } else {
                quote_ident(&column.name)
            }
        })
        .collect();
    format!(
        "CREATE TABLE {} ({})",
        quote_ident(table),
        definitions.join(", ")
    )
}

pub(crate) fn insert_sql(table: &str, columns: &[ColumnProfile]) -> String {
    let names: Vec<String> = columns
        .iter()
        .map(|column| quote_ident(&column.name))
        .collect();
    let placeholders: Vec<String> = (1..=names.len()).map(|idx| format!("?{idx}")).collect();
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quote_ident(table),
        names.join(", "),
        placeholders.join(", ")
    )
}

/// Booleans are stored as 0/1; other non-scalar cells as their text.
pub(crate) fn to_sql(value: AnyValue<'_>) -> SqlValue {
    match value {
        AnyValue::Null => SqlValue::Null,
        AnyValue::Boolean(b) => SqlValue::Integer(i64::from(b)),
        AnyValue::Int64(n) => SqlValue::Integer(n),
        AnyValue::Int32(n) => SqlValue::Integer(i64::from(n)),
        AnyValue::UInt32(n) => SqlValue::Integer(i64::from(n)),
        AnyValue::UInt64(n) => i64::try_from(n).map_or(SqlValue::Real(n as f64), SqlValue::Integer),
        AnyValue::Float64(f) => SqlValue::Real(f),
        AnyValue::Float32(f) => SqlValue::Real(f64::from(f)),
        AnyValue::String(s) => SqlValue::Text(s.to_string()),
        AnyValue::StringOwned(s) => SqlValue::Text(s.to_string()),
        other => SqlValue::Text(cell_text(other)),
    }
}

/// `(name, declared type)` for each column of `table`; empty if it does not exist.
pub(crate) fn table_columns(
    conn: &Connection,
    table: &str,
) -> rusqlite::Result<Vec<(String, String)>> {
    let mut stmt = conn.prepare("SELECT name, type FROM pragma_table_info(?1) ORDER BY cid")?;
    let rows = stmt.query_map([table], |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
    })?;
    rows.collect()
}
