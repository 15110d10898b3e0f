//! Partial lifecycle updates applied to persisted tasks.

use super::TaskStatus;
use chrono::{DateTime, Utc};

/// Change to a single optional field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FieldChange<T> {
    /// Leave the stored value untouched.
    #[default]
    Keep,
    /// Replace the stored value.
    Set(T),
    /// Remove the stored value.
    Clear,
}

impl<T> FieldChange<T> {
    /// Applies the change to `field`.
    pub fn apply_to(self, field: &mut Option<T>) {
        match self {
            Self::Keep => {}
            Self::Set(value) => *field = Some(value),
            Self::Clear => *field = None,
        }
    }

    /// Returns the change as a nullable column update: `None` to keep,
    /// `Some(None)` to clear, `Some(Some(value))` to set.
    #[must_use]
    pub fn into_nullable(self) -> Option<Option<T>> {
        match self {
            Self::Keep => None,
            Self::Set(value) => Some(Some(value)),
            Self::Clear => Some(None),
        }
    }
}

/// Set of lifecycle field changes written in one store update.
///
/// Only the execution service builds updates, through the constructors
/// below; each constructor keeps the output/error exclusivity invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskUpdate {
    status: TaskStatus,
    output: FieldChange<String>,
    error_message: FieldChange<String>,
    processing_time_ms: Option<u64>,
    completed_at: FieldChange<DateTime<Utc>>,
    updated_at: DateTime<Utc>,
}

impl TaskUpdate {
    /// Marks the start of an attempt. Results of earlier attempts are kept
    /// until the new attempt ends.
    #[must_use]
    pub const fn start_processing(at: DateTime<Utc>) -> Self {
        Self {
            status: TaskStatus::Processing,
            output: FieldChange::Keep,
            error_message: FieldChange::Keep,
            processing_time_ms: None,
            completed_at: FieldChange::Keep,
            updated_at: at,
        }
    }

    /// Records a successful attempt.
    #[must_use]
    pub const fn complete(output: String, processing_time_ms: u64, at: DateTime<Utc>) -> Self {
        Self {
            status: TaskStatus::Completed,
            output: FieldChange::Set(output),
            error_message: FieldChange::Clear,
            processing_time_ms: Some(processing_time_ms),
            completed_at: FieldChange::Set(at),
            updated_at: at,
        }
    }

    /// Records a failed attempt, clearing output left by earlier attempts.
    #[must_use]
    pub const fn fail(error_message: String, processing_time_ms: u64, at: DateTime<Utc>) -> Self {
        Self {
            status: TaskStatus::Failed,
            output: FieldChange::Clear,
            error_message: FieldChange::Set(error_message),
            processing_time_ms: Some(processing_time_ms),
            completed_at: FieldChange::Clear,
            updated_at: at,
        }
    }

    /// Returns the target status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the output change.
    #[must_use]
    pub const fn output(&self) -> &FieldChange<String> {
        &self.output
    }

    /// Returns the error-message change.
    #[must_use]
    pub const fn error_message(&self) -> &FieldChange<String> {
        &self.error_message
    }

    /// Returns the processing time to record, if any.
    #[must_use]
    pub const fn processing_time_ms(&self) -> Option<u64> {
        self.processing_time_ms
    }

    /// Returns the completion-timestamp change.
    #[must_use]
    pub const fn completed_at(&self) -> &FieldChange<DateTime<Utc>> {
        &self.completed_at
    }

    /// Returns the bookkeeping timestamp of the update.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}
