//! Task records and their lifecycle history.

use berth_id::{JobKey, TaskId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Constraint, ModelError, ScheduleStatus};

/// One lifecycle transition of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskEvent {
    pub status: ScheduleStatus,
    /// Milliseconds since the Unix epoch.
    pub timestamp_ms: i64,
}

impl TaskEvent {
    pub fn new(status: ScheduleStatus, timestamp_ms: i64) -> Self {
        Self {
            status,
            timestamp_ms,
        }
    }

    /// Event time as a UTC date-time, if representable.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp_ms)
    }
}

/// Job-level configuration a task was launched with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskConfig {
    pub job: JobKey,
    #[serde(default)]
    pub constraints: Vec<Constraint>,
}

impl TaskConfig {
    pub fn new(job: JobKey) -> Self {
        Self {
            job,
            constraints: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_constraints(mut self, constraints: Vec<Constraint>) -> Self {
        self.constraints = constraints;
        self
    }
}

/// Stored snapshot of one task incarnation.
///
/// # Invariants
///
/// - `events` are strictly ascending by `timestamp_ms`
/// - when `events` is non-empty, the last event's status equals `status`
///
/// Records are produced by the surrounding store; [`TaskRecord::validate`]
/// checks the invariants but nothing here enforces them on construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub task_id: TaskId,
    pub instance_id: u32,
    pub config: TaskConfig,
    pub status: ScheduleStatus,
    /// The task this one replaced on reschedule. Lookup key only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ancestor_id: Option<TaskId>,
    #[serde(default)]
    pub events: Vec<TaskEvent>,
}

impl TaskRecord {
    pub fn new(task_id: TaskId, instance_id: u32, config: TaskConfig, status: ScheduleStatus) -> Self {
        Self {
            task_id,
            instance_id,
            config,
            status,
            ancestor_id: None,
            events: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_ancestor(mut self, ancestor_id: TaskId) -> Self {
        self.ancestor_id = Some(ancestor_id);
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: ScheduleStatus) -> Self {
        self.status = status;
        self
    }

    /// Replaces the event history. The current status follows the last event.
    #[must_use]
    pub fn with_events(mut self, events: Vec<TaskEvent>) -> Self {
        if let Some(last) = events.last() {
            self.status = last.status;
        }
        self.events = events;
        self
    }

    pub fn job(&self) -> &JobKey {
        &self.config.job
    }

    pub fn first_event(&self) -> Option<&TaskEvent> {
        self.events.first()
    }

    pub fn latest_event(&self) -> Option<&TaskEvent> {
        self.events.last()
    }

    /// Milliseconds between the first and the latest recorded event.
    pub fn lifetime_ms(&self) -> Option<i64> {
        let first = self.first_event()?;
        let last = self.latest_event()?;
        Some(last.timestamp_ms.saturating_sub(first.timestamp_ms))
    }

    /// Returns true if any recorded event has one of `statuses`.
    pub fn passed_through(&self, statuses: &[ScheduleStatus]) -> bool {
        self.events.iter().any(|e| statuses.contains(&e.status))
    }

    /// Checks the record invariants.
    pub fn validate(&self) -> Result<(), ModelError> {
        for (index, pair) in self.events.windows(2).enumerate() {
            if pair[0].timestamp_ms >= pair[1].timestamp_ms {
                return Err(ModelError::EventsOutOfOrder {
                    index: index + 1,
                    previous_ms: pair[0].timestamp_ms,
                    current_ms: pair[1].timestamp_ms,
                });
            }
        }

        if let Some(latest) = self.latest_event() {
            if latest.status != self.status {
                return Err(ModelError::StatusMismatch {
                    status: self.status.to_string(),
                    latest: latest.status.to_string(),
                });
            }
        }

        Ok(())
    }
}
