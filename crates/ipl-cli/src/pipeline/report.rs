//! Record of one pipeline invocation, serializable as JSON.

use chrono::{DateTime, Utc};
use ipl_ingest::ArtifactInfo;
use serde::Serialize;

use super::state::{PipelineState, StageKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transition {
    pub from: PipelineState,
    pub to: PipelineState,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StageRecord {
    pub stage: StageKind,
    pub succeeded: bool,
    pub duration_ms: u64,
    pub rows: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact: Option<ArtifactInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub state: PipelineState,
    pub transitions: Vec<Transition>,
    pub stages: Vec<StageRecord>,
    pub notified: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RunReport {
    pub(crate) fn new(run_id: impl Into<String>) -> Self {
        Self {
            run_id: run_id.into(),
            started_at: Utc::now(),
            finished_at: None,
            state: PipelineState::Pending,
            transitions: Vec::new(),
            stages: Vec::new(),
            notified: false,
            error: None,
        }
    }

    /// Move to `next`, recording the transition.
    pub(crate) fn transition(&mut self, next: PipelineState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal transition {} -> {}",
            self.state,
            next
        );
        let at = Utc::now();
        self.transitions.push(Transition {
            from: self.state,
            to: next,
            at,
        });
        self.state = next;
        if next.is_terminal() {
            self.finished_at = Some(at);
        }
    }

    pub fn succeeded(&self) -> bool {
        self.state == PipelineState::Done
    }

    pub fn stage(&self, kind: StageKind) -> Option<&StageRecord> {
        self.stages.iter().find(|record| record.stage == kind)
    }

    /// States visited, starting with `PENDING`.
    pub fn path(&self) -> Vec<PipelineState> {
        std::iter::once(PipelineState::Pending)
            .chain(self.transitions.iter().map(|t| t.to))
            .collect()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
