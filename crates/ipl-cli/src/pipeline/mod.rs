//! Pipeline driver: an ordered list of stages plus a notifier, executed
//! through the run state machine.

mod error;
mod report;
mod stages;
mod state;

use std::time::{Duration, Instant};

use ipl_ingest::{Extractor, FileExtractor, HttpExtractor};
use tracing::{error, info, info_span, warn};

pub use error::StageError;
pub use report::{RunReport, StageRecord, Transition};
pub use stages::{
    ExtractStage, LoadStage, Stage, StageContext, StageOutcome, TransformStage, new_run_id,
};
pub use state::{PipelineState, StageKind};

use crate::config::{PipelineConfig, SourceConfig};
use crate::notify::{CommandNotifier, LogNotifier, Notification, Notifier, NotifyError};

pub struct Pipeline {
    stages: Vec<Box<dyn Stage>>,
    notifier: Box<dyn Notifier>,
    message: String,
}

impl Pipeline {
    pub fn new(notifier: Box<dyn Notifier>, message: impl Into<String>) -> Self {
        Self {
            stages: Vec::new(),
            notifier,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn with_stage(mut self, stage: Box<dyn Stage>) -> Self {
        self.stages.push(stage);
        self
    }

    pub fn stage_kinds(&self) -> Vec<StageKind> {
        self.stages.iter().map(|stage| stage.kind()).collect()
    }

    /// Run every stage, then notify.
    pub fn run(&self, ctx: &StageContext) -> RunReport {
        self.run_from(ctx, StageKind::Extract)
    }

    /// Run the stages from `from` onwards, then notify.
    ///
    /// Resuming past the extract stage relies on the artifacts an earlier run
    /// left behind; a missing input fails the resumed stage.
    pub fn run_from(&self, ctx: &StageContext, from: StageKind) -> RunReport {
        let span = info_span!("run", run_id = %ctx.run_id);
        let _enter = span.enter();
        let mut report = RunReport::new(&ctx.run_id);
        info!(from = %from, "pipeline started");

        let mut rows_loaded = None;
        for stage in self.stages.iter().filter(|stage| stage.kind() >= from) {
            report.transition(stage.state());
            let (record, result) = self.execute(stage.as_ref(), ctx);
            report.stages.push(record);
            match result {
                Ok(outcome) => {
                    if let Some(load) = outcome.load {
                        rows_loaded = Some(load.rows_written);
                    }
                }
                Err(err) => {
                    report.error = Some(err.to_string());
                    report.transition(PipelineState::Failed);
                    error!(state = %report.state, "pipeline failed");
                    return report;
                }
            }
        }

        if report.state != PipelineState::Loading {
            report.error = Some(format!("pipeline has no load stage after {from}"));
            report.transition(PipelineState::Failed);
            error!(state = %report.state, "pipeline failed");
            return report;
        }

        report.transition(PipelineState::Notifying);
        match self.notify(ctx, rows_loaded) {
            Ok(()) => report.notified = true,
            Err(err) => warn!(error = %err, "notification failed"),
        }
        report.transition(PipelineState::Done);

        info!(state = %report.state, "pipeline finished");
        report
    }

    /// Run exactly one stage, without notifying.
    pub fn run_stage(&self, ctx: &StageContext, kind: StageKind) -> Result<StageRecord, StageError> {
        let span = info_span!("run", run_id = %ctx.run_id);
        let _enter = span.enter();
        let stage = self
            .stages
            .iter()
            .find(|stage| stage.kind() == kind)
            .ok_or(StageError::NotConfigured(kind))?;
        let (record, result) = self.execute(stage.as_ref(), ctx);
        result.map(|_| record)
    }

    /// Send the completion message through the configured notifier.
    pub fn notify(&self, ctx: &StageContext, rows_loaded: Option<usize>) -> Result<(), NotifyError> {
        self.notifier.notify(&Notification {
            message: self.message.clone(),
            run_id: ctx.run_id.clone(),
            rows_loaded,
        })
    }

    fn execute(
        &self,
        stage: &dyn Stage,
        ctx: &StageContext,
    ) -> (StageRecord, Result<StageOutcome, StageError>) {
        let span = info_span!("stage", stage = stage.name());
        let _enter = span.enter();
        let started = Instant::now();
        let result = stage.run(ctx);
        let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        let record = match &result {
            Ok(outcome) => {
                info!(
                    rows = outcome.rows,
                    duration_ms,
                    artifact = ?outcome.artifact.as_ref().map(|a| a.path.display().to_string()),
                    "stage completed"
                );
                StageRecord {
                    stage: stage.kind(),
                    succeeded: true,
                    duration_ms,
                    rows: Some(outcome.rows),
                    artifact: outcome.artifact.clone(),
                    detail: outcome.detail.clone(),
                    error: None,
                }
            }
            Err(err) => {
                error!(error = %err, duration_ms, "stage failed");
                StageRecord {
                    stage: stage.kind(),
                    succeeded: false,
                    duration_ms,
                    rows: None,
                    artifact: None,
                    detail: None,
                    error: Some(err.to_string()),
                }
            }
        };
        (record, result)
    }
}

/// The stock extract, transform and load chain described by `config`.
pub fn batting_pipeline(config: &PipelineConfig) -> Pipeline {
    let extractor: Box<dyn Extractor> = match config.resolved_source() {
        SourceConfig::File { path } => Box::new(FileExtractor::new(path)),
        SourceConfig::Http { url, timeout_secs } => Box::new(
            HttpExtractor::new(url).with_timeout(Duration::from_secs(timeout_secs)),
        ),
    };
    let notifier: Box<dyn Notifier> = match &config.notify.command {
        Some(command) => Box::new(
            CommandNotifier::new(command)
                .with_timeout(Duration::from_secs(config.notify.timeout_secs)),
        ),
        None => Box::new(LogNotifier),
    };

    Pipeline::new(notifier, &config.notify.message)
        .with_stage(Box::new(ExtractStage::new(extractor)))
        .with_stage(Box::new(TransformStage::new(config.transform)))
        .with_stage(Box::new(LoadStage::new(&config.table, config.load.mode)))
}
