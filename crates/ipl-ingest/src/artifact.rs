//! Staged artifacts: the CSV files handed from one stage to the next.
//!
//! Format: UTF-8, comma separated, `"` quoting where needed, `\n` record
//! terminator, header first, no row-index column. Writes go to a hidden
//! temporary file in the target directory which is synced and persisted over
//! the target, so readers only ever observe a complete artifact. The
//! temporary file is removed if any step fails.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use polars::prelude::*;
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::error::ArtifactError;
use crate::table::read_csv_file;

/// What was written by [`write_artifact`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactInfo {
    pub path: PathBuf,
    pub rows: usize,
    /// Hex SHA-256 of the file contents.
    pub sha256: String,
}

/// Encode a frame into artifact bytes.
pub fn render_artifact(df: &DataFrame) -> PolarsResult<Vec<u8>> {
    let mut frame = df.clone();
    let mut buffer = Vec::new();
    CsvWriter::new(&mut buffer)
        .include_header(true)
        .finish(&mut frame)?;
    Ok(buffer)
}

/// Atomically write `df` to `path`.
pub fn write_artifact(df: &DataFrame, path: &Path) -> Result<ArtifactInfo, ArtifactError> {
    let bytes = render_artifact(df).map_err(|source| ArtifactError::Encode {
        path: path.to_path_buf(),
        source,
    })?;

    let dir = match path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        Some(parent) => {
            fs::create_dir_all(parent).map_err(|source| ArtifactError::Io {
                operation: "create directory for",
                path: parent.to_path_buf(),
                source,
            })?;
            parent
        }
        None => Path::new("."),
    };

    let io_err = |operation: &'static str| {
        move |source| ArtifactError::Io {
            operation,
            path: path.to_path_buf(),
            source,
        }
    };
    let mut temp = tempfile::Builder::new()
        .prefix(".ipl-artifact-")
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(io_err("stage"))?;
    temp.write_all(&bytes).map_err(io_err("write"))?;
    temp.as_file().sync_all().map_err(io_err("sync"))?;
    temp.persist(path).map_err(|err| io_err("replace")(err.error))?;

    let info = ArtifactInfo {
        path: path.to_path_buf(),
        rows: df.height(),
        sha256: hex::encode(Sha256::digest(&bytes)),
    };
    tracing::debug!(
        path = %info.path.display(),
        rows = info.rows,
        sha256 = %info.sha256,
        "artifact written"
    );
    Ok(info)
}

/// Read an artifact back into a frame, inferring column types.
pub fn read_artifact(path: &Path) -> Result<DataFrame, ArtifactError> {
    fs::metadata(path).map_err(|source| ArtifactError::Io {
        operation: "open",
        path: path.to_path_buf(),
        source,
    })?;
    read_csv_file(path).map_err(|source| ArtifactError::Malformed {
        path: path.to_path_buf(),
        source,
    })
}
