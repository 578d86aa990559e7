use std::time::Duration;

use thiserror::Error;

/// Errors raised while building reschedule settings.
///
/// Penalty computation itself never fails.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RescheduleError {
    /// A duration setting must be strictly positive.
    #[error("{setting} must be positive, got {value:?}")]
    NonPositiveDuration {
        setting: &'static str,
        value: Duration,
    },

    /// Backoff bounds are inconsistent.
    #[error("invalid backoff: {0}")]
    InvalidBackoff(String),

    /// An environment variable could not be parsed.
    #[error("invalid value for {var}: '{value}' ({message})")]
    InvalidEnv {
        var: &'static str,
        value: String,
        message: String,
    },
}

impl RescheduleError {
    /// Returns true if this error came from reading the environment.
    pub fn is_env_error(&self) -> bool {
        matches!(self, RescheduleError::InvalidEnv { .. })
    }
}
