use std::path::PathBuf;

use ipl_ingest::{ArtifactError, ExtractError};
use ipl_load::LoadError;
use ipl_transform::TransformError;
use thiserror::Error;

use super::state::StageKind;

/// Why a stage failed. Each variant belongs to exactly one stage, except the
/// artifact and wiring errors any stage can hit.
#[derive(Debug, Error)]
pub enum StageError {
    #[error("extract failed: {0}")]
    Extract(#[from] ExtractError),

    #[error("transform failed: {0}")]
    Transform(#[from] TransformError),

    #[error("load failed: {0}")]
    Load(#[from] LoadError),

    #[error(transparent)]
    Artifact(#[from] ArtifactError),

    #[error("{stage} stage needs {path}, which does not exist")]
    MissingArtifact { stage: StageKind, path: PathBuf },

    #[error("pipeline has no {0} stage")]
    NotConfigured(StageKind),
}
