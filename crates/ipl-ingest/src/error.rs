//! Error types for extraction and artifact I/O.

use std::path::PathBuf;

use ipl_model::ModelError;
use polars::prelude::PolarsError;
use thiserror::Error;

/// Failures turning CSV text into a frame.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("csv: {0}")]
    Csv(#[from] PolarsError),

    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Errors reading or writing a staged artifact.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("failed to {operation} artifact {path}: {source}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode artifact {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: PolarsError,
    },

    #[error("malformed artifact {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: TableError,
    },
}

/// Errors raised by an [`Extractor`](crate::Extractor).
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The source could not be reached or read.
    #[error("source unavailable ({origin}): {reason}")]
    SourceUnavailable { origin: String, reason: String },

    /// The source answered but its data is not tabular.
    #[error("source data is not tabular ({origin}): {reason}")]
    SchemaMismatch { origin: String, reason: String },
}

impl ExtractError {
    /// Bytes were acquired, so any parse failure is a data problem.
    pub(crate) fn from_table(origin: &str, err: &TableError) -> Self {
        ExtractError::SchemaMismatch {
            origin: origin.to_string(),
            reason: err.to_string(),
        }
    }
}
