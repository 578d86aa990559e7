//! Reschedule configuration from the environment or a config document.

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;

use crate::{RescheduleError, RescheduleSettings, TruncatedBinaryBackoff};

const ENV_FLAPPING_THRESHOLD_MS: &str = "BERTH_FLAPPING_THRESHOLD_MS";
const ENV_MAX_STARTUP_DELAY_MS: &str = "BERTH_MAX_STARTUP_DELAY_MS";
const ENV_BACKOFF_INITIAL_MS: &str = "BERTH_FLAPPING_BACKOFF_INITIAL_MS";
const ENV_BACKOFF_MAX_MS: &str = "BERTH_FLAPPING_BACKOFF_MAX_MS";

/// Raw reschedule configuration.
///
/// Unset fields take the defaults below. Nothing is validated until
/// [`RescheduleConfig::into_settings`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RescheduleConfig {
    /// Tasks living shorter than this are flapping (default: 5 minutes).
    pub flapping_threshold_ms: u64,

    /// Maximum startup delay (default: 1 minute).
    pub max_startup_delay_ms: u64,

    /// First flapping penalty (default: 1 second).
    pub backoff_initial_ms: u64,

    /// Largest flapping penalty (default: 5 minutes).
    pub backoff_max_ms: u64,
}

impl Default for RescheduleConfig {
    fn default() -> Self {
        Self {
            flapping_threshold_ms: 5 * 60 * 1000,
            max_startup_delay_ms: 60 * 1000,
            backoff_initial_ms: 1000,
            backoff_max_ms: 5 * 60 * 1000,
        }
    }
}

impl RescheduleConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, RescheduleError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, RescheduleError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let defaults = Self::default();

        let read = |var: &'static str, default: u64| -> Result<u64, RescheduleError> {
            match lookup(var) {
                None => Ok(default),
                Some(value) => value
                    .trim()
                    .parse()
                    .map_err(|e: std::num::ParseIntError| RescheduleError::InvalidEnv {
                        var,
                        value,
                        message: e.to_string(),
                    }),
            }
        };

        Ok(Self {
            flapping_threshold_ms: read(ENV_FLAPPING_THRESHOLD_MS, defaults.flapping_threshold_ms)?,
            max_startup_delay_ms: read(ENV_MAX_STARTUP_DELAY_MS, defaults.max_startup_delay_ms)?,
            backoff_initial_ms: read(ENV_BACKOFF_INITIAL_MS, defaults.backoff_initial_ms)?,
            backoff_max_ms: read(ENV_BACKOFF_MAX_MS, defaults.backoff_max_ms)?,
        })
    }

    /// Validates the configuration and builds settings backed by a
    /// [`TruncatedBinaryBackoff`].
    pub fn into_settings(self) -> Result<RescheduleSettings, RescheduleError> {
        let backoff = TruncatedBinaryBackoff::new(
            Duration::from_millis(self.backoff_initial_ms),
            Duration::from_millis(self.backoff_max_ms),
        )?;

        RescheduleSettings::new(
            Arc::new(backoff),
            Duration::from_millis(self.flapping_threshold_ms),
            Duration::from_millis(self.max_startup_delay_ms),
        )
    }
}
