//! Task type and priority enumerations.

use super::ParseTaskFieldError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of natural-language processing requested by a task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    /// Condense input into a summary.
    Summarization,
    /// Analyse input for trends and insight.
    Analysis,
    /// Research and synthesize findings.
    Research,
    /// Write new content.
    ContentGeneration,
    /// Write source code.
    CodeGeneration,
    /// Translate between languages.
    Translation,
    /// General-purpose request.
    #[default]
    Custom,
}

impl TaskType {
    /// Every task type, in declaration order.
    pub const ALL: [Self; 7] = [
        Self::Summarization,
        Self::Analysis,
        Self::Research,
        Self::ContentGeneration,
        Self::CodeGeneration,
        Self::Translation,
        Self::Custom,
    ];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Summarization => "summarization",
            Self::Analysis => "analysis",
            Self::Research => "research",
            Self::ContentGeneration => "content_generation",
            Self::CodeGeneration => "code_generation",
            Self::Translation => "translation",
            Self::Custom => "custom",
        }
    }

    /// Parses a stored type name, treating unrecognized names as `custom`.
    #[must_use]
    pub fn from_name_or_custom(name: &str) -> Self {
        Self::try_from(name).unwrap_or(Self::Custom)
    }
}

impl TryFrom<&str> for TaskType {
    type Error = ParseTaskFieldError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| ParseTaskFieldError::new("type", value))
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scheduling priority recorded with a task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    /// Low priority.
    Low,
    /// Medium priority.
    #[default]
    Medium,
    /// High priority.
    High,
}

impl TaskPriority {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl TryFrom<&str> for TaskPriority {
    type Error = ParseTaskFieldError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(ParseTaskFieldError::new("priority", value)),
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
