//! Run states and the transitions allowed between them.

use std::fmt;

use serde::Serialize;

/// The three data stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StageKind {
    Extract,
    Transform,
    Load,
}

impl StageKind {
    pub const ALL: [StageKind; 3] = [StageKind::Extract, StageKind::Transform, StageKind::Load];

    pub fn as_str(&self) -> &'static str {
        match self {
            StageKind::Extract => "extract",
            StageKind::Transform => "transform",
            StageKind::Load => "load",
        }
    }

    /// State the run is in while this stage executes.
    pub fn state(&self) -> PipelineState {
        match self {
            StageKind::Extract => PipelineState::Extracting,
            StageKind::Transform => PipelineState::Transforming,
            StageKind::Load => PipelineState::Loading,
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PipelineState {
    Pending,
    Extracting,
    Transforming,
    Loading,
    Notifying,
    Done,
    Failed,
}

impl PipelineState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineState::Pending => "PENDING",
            PipelineState::Extracting => "EXTRACTING",
            PipelineState::Transforming => "TRANSFORMING",
            PipelineState::Loading => "LOADING",
            PipelineState::Notifying => "NOTIFYING",
            PipelineState::Done => "DONE",
            PipelineState::Failed => "FAILED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, PipelineState::Done | PipelineState::Failed)
    }

    /// Position in the linear chain; `None` for `Failed`.
    fn rank(&self) -> Option<u8> {
        match self {
            PipelineState::Pending => Some(0),
            PipelineState::Extracting => Some(1),
            PipelineState::Transforming => Some(2),
            PipelineState::Loading => Some(3),
            PipelineState::Notifying => Some(4),
            PipelineState::Done => Some(5),
            PipelineState::Failed => None,
        }
    }

    /// Forward by exactly one step, or from `Pending` straight to a later
    /// stage when resuming; any non-terminal state may fail.
    pub fn can_transition_to(&self, next: PipelineState) -> bool {
        if self.is_terminal() {
            return false;
        }
        match (self.rank(), next.rank()) {
            (_, None) => true,
            (Some(0), Some(to)) => (1..=3).contains(&to),
            (Some(from), Some(to)) => to == from + 1,
            (None, _) => false,
        }
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
