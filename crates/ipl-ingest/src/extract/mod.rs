//! Extractors: where raw batting data comes from.

mod file;
mod http;

pub use file::FileExtractor;
pub use http::HttpExtractor;

use polars::prelude::DataFrame;

use crate::error::ExtractError;
use crate::table::read_csv_bytes;

/// A source of raw batting records.
pub trait Extractor {
    /// Human-readable origin, used in logs and errors.
    fn origin(&self) -> String;

    /// Acquire the raw frame.
    fn extract(&self) -> Result<DataFrame, ExtractError>;
}

/// Parse CSV text from a third-party source into a frame.
pub(crate) fn parse_source(origin: &str, bytes: Vec<u8>) -> Result<DataFrame, ExtractError> {
    read_csv_bytes(bytes).map_err(|err| ExtractError::from_table(origin, &err))
}
