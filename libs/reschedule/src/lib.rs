//! Reschedule penalties for flapping tasks.
//!
//! A task that keeps dying shortly after it starts is "flapping". Each time
//! it is rescheduled the replacement records the dead task as its ancestor.
//! [`RescheduleCalculator`] walks that ancestry and turns a run of flapping
//! ancestors into a delay, using a pluggable [`BackoffStrategy`].
//!
//! # Invariants
//!
//! - The result depends only on the task, the store contents, and the settings
//! - The walk stops at the first missing or non-flapping ancestor, or as soon
//!   as the backoff sequence stops growing
//! - Settings are validated once, at construction

mod backoff;
mod calculator;
mod config;
mod error;
mod settings;

pub use backoff::{BackoffStrategy, ConstantBackoff, TruncatedBinaryBackoff};
pub use calculator::RescheduleCalculator;
pub use config::RescheduleConfig;
pub use error::RescheduleError;
pub use settings::{RescheduleSettings, DEFAULT_INTERRUPTED_STATUSES};
