use serde::{Deserialize, Serialize};

/// Lifecycle state of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScheduleStatus {
    /// Initial state before the task is persisted.
    Init,
    /// Held back by the scheduler before becoming pending.
    Throttled,
    /// Waiting for a host.
    Pending,
    /// Matched to a host, launch requested.
    Assigned,
    /// Host is preparing the sandbox.
    Starting,
    Running,
    /// Exited with success.
    Finished,
    /// Being killed to make room for a higher priority task.
    Preempting,
    /// Being killed so it can be restarted.
    Restarting,
    /// Being killed because its host is draining.
    Draining,
    /// Exited with failure.
    Failed,
    /// Killed on request.
    Killed,
    /// Kill requested, not yet confirmed.
    Killing,
    /// State unknown to the scheduler; presumed gone.
    Lost,
    /// Host unreachable; the task may still be running.
    Partitioned,
}

impl ScheduleStatus {
    /// Every status, in declaration order.
    pub const ALL: [ScheduleStatus; 15] = [
        Self::Init,
        Self::Throttled,
        Self::Pending,
        Self::Assigned,
        Self::Starting,
        Self::Running,
        Self::Finished,
        Self::Preempting,
        Self::Restarting,
        Self::Draining,
        Self::Failed,
        Self::Killed,
        Self::Killing,
        Self::Lost,
        Self::Partitioned,
    ];

    /// Returns `true` if the task will not transition further.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Finished | Self::Failed | Self::Killed | Self::Lost
        )
    }

    /// Returns `true` if the task occupies, or is about to occupy, a host.
    pub fn is_active(&self) -> bool {
        !self.is_terminal() && !matches!(self, Self::Init)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Init => "INIT",
            Self::Throttled => "THROTTLED",
            Self::Pending => "PENDING",
            Self::Assigned => "ASSIGNED",
            Self::Starting => "STARTING",
            Self::Running => "RUNNING",
            Self::Finished => "FINISHED",
            Self::Preempting => "PREEMPTING",
            Self::Restarting => "RESTARTING",
            Self::Draining => "DRAINING",
            Self::Failed => "FAILED",
            Self::Killed => "KILLED",
            Self::Killing => "KILLING",
            Self::Lost => "LOST",
            Self::Partitioned => "PARTITIONED",
        }
    }
}

impl std::fmt::Display for ScheduleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
