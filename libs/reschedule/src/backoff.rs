//! Backoff strategies.
//!
//! A strategy maps the previous delay to the next one. The penalty walk
//! assumes the sequence never shrinks and stops as soon as it stops growing,
//! so a strategy that grows forever makes every walk read the whole ancestry.

use std::time::Duration;

use crate::RescheduleError;

/// Computes the next delay from the previous one.
pub trait BackoffStrategy: Send + Sync {
    /// Next delay in milliseconds. `last_backoff_ms` is `0` on the first call.
    fn calculate_backoff_ms(&self, last_backoff_ms: u64) -> u64;
}

impl<F> BackoffStrategy for F
where
    F: Fn(u64) -> u64 + Send + Sync,
{
    fn calculate_backoff_ms(&self, last_backoff_ms: u64) -> u64 {
        self(last_backoff_ms)
    }
}

/// Doubles the previous delay, starting at `initial` and capped at `max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TruncatedBinaryBackoff {
    initial_ms: u64,
    max_ms: u64,
}

impl TruncatedBinaryBackoff {
    pub fn new(initial: Duration, max: Duration) -> Result<Self, RescheduleError> {
        let initial_ms = duration_ms(initial);
        let max_ms = duration_ms(max);

        if initial_ms == 0 {
            return Err(RescheduleError::InvalidBackoff(
                "initial backoff must be at least 1ms".to_string(),
            ));
        }
        if max_ms < initial_ms {
            return Err(RescheduleError::InvalidBackoff(format!(
                "max backoff {max_ms}ms is below initial backoff {initial_ms}ms"
            )));
        }

        Ok(Self { initial_ms, max_ms })
    }

    pub fn initial(&self) -> Duration {
        Duration::from_millis(self.initial_ms)
    }

    pub fn max(&self) -> Duration {
        Duration::from_millis(self.max_ms)
    }
}

impl BackoffStrategy for TruncatedBinaryBackoff {
    fn calculate_backoff_ms(&self, last_backoff_ms: u64) -> u64 {
        if last_backoff_ms == 0 {
            return self.initial_ms;
        }
        last_backoff_ms.saturating_mul(2).min(self.max_ms)
    }
}

/// Always the same delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstantBackoff {
    delay_ms: u64,
}

impl ConstantBackoff {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay_ms: duration_ms(delay),
        }
    }
}

impl BackoffStrategy for ConstantBackoff {
    fn calculate_backoff_ms(&self, _last_backoff_ms: u64) -> u64 {
        self.delay_ms
    }
}

pub(crate) fn duration_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}
