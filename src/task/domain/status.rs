//! Task execution status machine.

use super::ParseTaskFieldError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Task lifecycle status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Task has been created and never executed.
    #[default]
    Pending,
    /// An execution attempt is in progress.
    Processing,
    /// The latest attempt produced output.
    Completed,
    /// The latest attempt failed.
    Failed,
}

impl TaskStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [Self; 4] = [
        Self::Pending,
        Self::Processing,
        Self::Completed,
        Self::Failed,
    ];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    /// Returns `true` for statuses that end an attempt.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Returns whether moving from `self` to `target` is permitted.
    ///
    /// Any status may start a new attempt; `processing` is included so a
    /// task orphaned mid-attempt can be executed again. An attempt may
    /// finish once the task has been started, so when overlapping attempts
    /// race the last finish write wins. A `pending` task cannot finish.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        match target {
            Self::Processing => true,
            Self::Completed | Self::Failed => !matches!(self, Self::Pending),
            Self::Pending => false,
        }
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskFieldError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            _ => Err(ParseTaskFieldError::new("status", value)),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
