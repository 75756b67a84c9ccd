//! The extract, transform and load stages.
//!
//! Stages never pass frames to each other in memory: each one reads its
//! input artifact from disk and writes its output artifact before returning.

use std::path::Path;

use chrono::Utc;
use ipl_ingest::{ArtifactInfo, Extractor, read_artifact, write_artifact};
use ipl_load::{LoadMode, LoadSummary, Loader};
use ipl_transform::{TransformOptions, transform};
use tracing::{info, warn};

use super::error::StageError;
use super::state::{PipelineState, StageKind};
use crate::config::{ArtifactPaths, PipelineConfig};

/// Everything a stage may touch, injected by the driver.
#[derive(Debug, Clone)]
pub struct StageContext {
    pub run_id: String,
    pub paths: ArtifactPaths,
}

impl StageContext {
    pub fn new(run_id: impl Into<String>, paths: ArtifactPaths) -> Self {
        Self {
            run_id: run_id.into(),
            paths,
        }
    }

    /// Context for a fresh run id.
    pub fn for_config(config: &PipelineConfig) -> Self {
        Self::new(new_run_id(), config.artifact_paths())
    }
}

/// UTC timestamp with millisecond precision, e.g. `20240405T101112.123Z`.
pub fn new_run_id() -> String {
    Utc::now().format("%Y%m%dT%H%M%S%.3fZ").to_string()
}

/// Result of a successful stage.
#[derive(Debug, Clone, Default)]
pub struct StageOutcome {
    pub rows: usize,
    pub artifact: Option<ArtifactInfo>,
    pub load: Option<LoadSummary>,
    pub detail: Option<String>,
}

pub trait Stage {
    fn kind(&self) -> StageKind;

    fn name(&self) -> &'static str {
        self.kind().as_str()
    }

    /// State the run is in while this stage executes.
    fn state(&self) -> PipelineState {
        self.kind().state()
    }

    fn run(&self, ctx: &StageContext) -> Result<StageOutcome, StageError>;
}

fn require_input(stage: StageKind, path: &Path) -> Result<(), StageError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(StageError::MissingArtifact {
            stage,
            path: path.to_path_buf(),
        })
    }
}

pub struct ExtractStage {
    extractor: Box<dyn Extractor>,
}

impl ExtractStage {
    pub fn new(extractor: Box<dyn Extractor>) -> Self {
        Self { extractor }
    }
}

impl Stage for ExtractStage {
    fn kind(&self) -> StageKind {
        StageKind::Extract
    }

    fn run(&self, ctx: &StageContext) -> Result<StageOutcome, StageError> {
        let origin = self.extractor.origin();
        info!(%origin, "extracting");
        let raw = self.extractor.extract()?;
        let artifact = write_artifact(&raw, &ctx.paths.extracted)?;
        Ok(StageOutcome {
            rows: artifact.rows,
            artifact: Some(artifact),
            load: None,
            detail: Some(format!("from {origin}")),
        })
    }
}

pub struct TransformStage {
    options: TransformOptions,
}

impl TransformStage {
    pub fn new(options: TransformOptions) -> Self {
        Self { options }
    }
}

impl Stage for TransformStage {
    fn kind(&self) -> StageKind {
        StageKind::Transform
    }

    fn run(&self, ctx: &StageContext) -> Result<StageOutcome, StageError> {
        require_input(self.kind(), &ctx.paths.extracted)?;
        let input = read_artifact(&ctx.paths.extracted)?;
        let output = transform(&input, &self.options)?;
        if output.dropped_invalid > 0 {
            warn!(
                dropped = output.dropped_invalid,
                "invalid rows dropped by policy"
            );
        }
        let artifact = write_artifact(&output.frame, &ctx.paths.transformed)?;
        Ok(StageOutcome {
            rows: artifact.rows,
            artifact: Some(artifact),
            load: None,
            detail: Some(format!(
                "{} in, {} zero-ball dropped, {} invalid dropped",
                input.height(),
                output.dropped_zero_balls,
                output.dropped_invalid
            )),
        })
    }
}

pub struct LoadStage {
    table: String,
    mode: LoadMode,
}

impl LoadStage {
    pub fn new(table: impl Into<String>, mode: LoadMode) -> Self {
        Self {
            table: table.into(),
            mode,
        }
    }
}

impl Stage for LoadStage {
    fn kind(&self) -> StageKind {
        StageKind::Load
    }

    fn run(&self, ctx: &StageContext) -> Result<StageOutcome, StageError> {
        require_input(self.kind(), &ctx.paths.transformed)?;
        let loader = Loader::new(&ctx.paths.database, &self.table).with_mode(self.mode);
        let summary = loader.load(&ctx.paths.transformed)?;
        Ok(StageOutcome {
            rows: summary.rows_written,
            artifact: None,
            detail: Some(format!(
                "{} table '{}' in {}",
                if summary.table_created {
                    "created"
                } else {
                    "updated"
                },
                summary.table,
                ctx.paths.database.display()
            )),
            load: Some(summary),
        })
    }
}
