//! Error types for availability-engine operations.

use thiserror::Error;

use crate::diff::CategoryId;
use crate::schedule::ScheduleId;
use crate::validate::ValidationReport;

#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("Invalid time format: {0:?} (expected e.g. 09:00 AM)")]
    InvalidTimeFormat(String),

    #[error("Schedule not found: {0}")]
    NotFound(ScheduleId),

    /// Persistence failed. The caller's in-memory edits are left untouched so
    /// the operation can be retried.
    #[error("Schedule store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Failed to apply {} category link(s): {}", .failed.len(), join_ids(.failed))]
    PartialLinkFailure { failed: Vec<CategoryId> },

    #[error("Save refused: {0}")]
    SaveBlocked(ValidationReport),

    #[error("A schedule named {0:?} already exists")]
    DuplicateName(String),

    #[error("Cannot delete the last schedule")]
    LastSchedule,

    #[error("Configuration error: {0}")]
    Config(String),
}

fn join_ids(ids: &[CategoryId]) -> String {
    ids.iter()
        .map(|id| id.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
