use std::fs;
use std::path::{Path, PathBuf};

use polars::prelude::DataFrame;

use super::{Extractor, parse_source};
use crate::error::ExtractError;

/// Reads batting records from a CSV file on the local filesystem.
#[derive(Debug, Clone)]
pub struct FileExtractor {
    path: PathBuf,
}

impl FileExtractor {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Extractor for FileExtractor {
    fn origin(&self) -> String {
        self.path.display().to_string()
    }

    fn extract(&self) -> Result<DataFrame, ExtractError> {
        let origin = self.origin();
        let bytes = fs::read(&self.path).map_err(|err| ExtractError::SourceUnavailable {
            origin: origin.clone(),
            reason: err.to_string(),
        })?;
        let df = parse_source(&origin, bytes)?;
        tracing::debug!(%origin, rows = df.height(), "read source file");
        Ok(df)
    }
}
