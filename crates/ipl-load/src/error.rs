use std::path::PathBuf;

use ipl_ingest::ArtifactError;
use polars::prelude::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    /// The database could not be opened or written.
    #[error("storage unavailable ({database}): failed to {operation}: {source}")]
    StorageUnavailable {
        database: PathBuf,
        operation: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The artifact does not fit the existing table.
    #[error("table '{table}' has columns [{}] but artifact has [{}]", .existing.join(", "), .incoming.join(", "))]
    SchemaDrift {
        table: String,
        existing: Vec<String>,
        incoming: Vec<String>,
    },

    #[error(transparent)]
    Artifact(#[from] ArtifactError),

    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<PolarsError> for LoadError {
    fn from(err: PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, LoadError>;
