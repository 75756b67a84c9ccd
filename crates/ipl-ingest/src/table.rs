//! CSV parsing shared by extractors and the artifact reader.
//!
//! The first record is the header. Column types are inferred by polars from
//! every row, so a column reads as integer only when all of its cells do.
//! Empty cells are null; short rows are padded with nulls and rows with
//! extra fields are rejected.

use std::io::Cursor;
use std::path::Path;

use ipl_model::validate_headers;
use polars::prelude::*;

use crate::error::TableError;

fn read_options() -> CsvReadOptions {
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(None)
}

/// Parse CSV bytes held in memory.
pub fn read_csv_bytes(bytes: Vec<u8>) -> Result<DataFrame, TableError> {
    let df = read_options()
        .into_reader_with_file_handle(Cursor::new(bytes))
        .finish()?;
    validate_headers(&df)?;
    Ok(df)
}

/// Parse a CSV file.
pub fn read_csv_file(path: &Path) -> Result<DataFrame, TableError> {
    let df = read_options()
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;
    validate_headers(&df)?;
    Ok(df)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(text: &str) -> Result<DataFrame, TableError> {
        read_csv_bytes(text.as_bytes().to_vec())
    }

    #[test]
    fn infers_types_from_all_rows() {
        let df = read("player,runs,rate\nA,30,1\nB,45*,2.5\n").unwrap();
        assert_eq!(df.column("runs").unwrap().dtype(), &DataType::String);
        assert_eq!(df.column("rate").unwrap().dtype(), &DataType::Float64);
    }

    #[test]
    fn empty_cells_are_null() {
        let df = read("player,runs\nA,\nB,12\n").unwrap();
        let runs = df.column("runs").unwrap();
        assert_eq!(runs.dtype(), &DataType::Int64);
        assert_eq!(runs.null_count(), 1);
    }

    #[test]
    fn header_only_is_empty_frame() {
        let df = read("player,runs,balls\n").unwrap();
        assert_eq!(df.height(), 0);
        assert_eq!(df.width(), 3);
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(read("").is_err());
    }

    #[test]
    fn extra_fields_are_rejected() {
        assert!(read("player,runs\nA,30,20\n").is_err());
    }
}
