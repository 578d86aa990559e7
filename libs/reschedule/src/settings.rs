use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use berth_model::ScheduleStatus;

use crate::{BackoffStrategy, RescheduleError};

/// Statuses that mark a task as interrupted by an operator rather than
/// crashing on its own.
///
/// Only `KILLING` is included: a task killed on request passes through it on
/// the way to `KILLED`. Other candidates (`RESTARTING`, `DRAINING`,
/// `PREEMPTING`, `LOST`) are left to the caller via
/// [`RescheduleSettings::with_interrupted_statuses`].
pub const DEFAULT_INTERRUPTED_STATUSES: &[ScheduleStatus] = &[ScheduleStatus::Killing];

/// Validated configuration for [`crate::RescheduleCalculator`].
#[derive(Clone)]
pub struct RescheduleSettings {
    backoff: Arc<dyn BackoffStrategy>,
    flapping_threshold: Duration,
    max_startup_delay: Duration,
    interrupted_statuses: Vec<ScheduleStatus>,
}

impl RescheduleSettings {
    /// Builds settings, rejecting zero durations.
    pub fn new(
        backoff: Arc<dyn BackoffStrategy>,
        flapping_threshold: Duration,
        max_startup_delay: Duration,
    ) -> Result<Self, RescheduleError> {
        if flapping_threshold.is_zero() {
            return Err(RescheduleError::NonPositiveDuration {
                setting: "flapping_threshold",
                value: flapping_threshold,
            });
        }
        if max_startup_delay.is_zero() {
            return Err(RescheduleError::NonPositiveDuration {
                setting: "max_startup_delay",
                value: max_startup_delay,
            });
        }

        Ok(Self {
            backoff,
            flapping_threshold,
            max_startup_delay,
            interrupted_statuses: DEFAULT_INTERRUPTED_STATUSES.to_vec(),
        })
    }

    /// Replaces the set of statuses that mark an operator interruption.
    #[must_use]
    pub fn with_interrupted_statuses<I>(mut self, statuses: I) -> Self
    where
        I: IntoIterator<Item = ScheduleStatus>,
    {
        let mut statuses: Vec<_> = statuses.into_iter().collect();
        statuses.sort();
        statuses.dedup();
        self.interrupted_statuses = statuses;
        self
    }

    pub fn backoff(&self) -> &dyn BackoffStrategy {
        self.backoff.as_ref()
    }

    /// Tasks that lived shorter than this are considered flapping.
    pub fn flapping_threshold(&self) -> Duration {
        self.flapping_threshold
    }

    /// Upper bound on the delay applied to tasks entering the schedule for the
    /// first time. Carried for callers; the penalty walk does not use it.
    pub fn max_startup_delay(&self) -> Duration {
        self.max_startup_delay
    }

    pub fn interrupted_statuses(&self) -> &[ScheduleStatus] {
        &self.interrupted_statuses
    }
}

impl fmt::Debug for RescheduleSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RescheduleSettings")
            .field("flapping_threshold", &self.flapping_threshold)
            .field("max_startup_delay", &self.max_startup_delay)
            .field("interrupted_statuses", &self.interrupted_statuses)
            .finish_non_exhaustive()
    }
}
