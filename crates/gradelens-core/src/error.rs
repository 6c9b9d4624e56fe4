//! Insight engine error types.
//!
//! Empty inputs are never errors in this crate; they produce zeroed
//! payloads. The only failure a caller has to handle is a lookup of an
//! entity the store does not know about.

use thiserror::Error;

/// Errors returned by the insight engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InsightError {
    /// The requested student does not exist in the store.
    #[error("student not found: {0}")]
    StudentNotFound(i64),
}

impl InsightError {
    /// Returns `true` if this error means the requested entity is missing
    /// (the caller's 404 case).
    pub fn is_not_found(&self) -> bool {
        matches!(self, InsightError::StudentNotFound(_))
    }
}
