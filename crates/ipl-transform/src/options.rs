use serde::{Deserialize, Serialize};

/// What to do with a row that fails validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidRowPolicy {
    /// Fail the whole batch on the first invalid row.
    #[default]
    Abort,
    /// Drop the row, log it, and keep going.
    Drop,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformOptions {
    #[serde(default)]
    pub on_invalid_row: InvalidRowPolicy,
}

impl TransformOptions {
    #[must_use]
    pub fn with_invalid_row_policy(mut self, policy: InvalidRowPolicy) -> Self {
        self.on_invalid_row = policy;
        self
    }
}
