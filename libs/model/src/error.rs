//! Error types for the data model.

use thiserror::Error;

/// Errors raised when a model value violates its invariants.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// Task events are not strictly ascending by timestamp.
    #[error("task events out of order at index {index}: {previous_ms} >= {current_ms}")]
    EventsOutOfOrder {
        index: usize,
        previous_ms: i64,
        current_ms: i64,
    },

    /// The latest event disagrees with the task's current status.
    #[error("task status {status} does not match latest event status {latest}")]
    StatusMismatch { status: String, latest: String },

    /// A constraint populates neither or both of its union fields.
    #[error("constraint '{name}' has an unrecognized shape: {detail}")]
    MalformedConstraint { name: String, detail: String },
}

impl ModelError {
    /// Returns true if this error comes from a constraint body.
    pub fn is_constraint_error(&self) -> bool {
        matches!(self, ModelError::MalformedConstraint { .. })
    }
}
