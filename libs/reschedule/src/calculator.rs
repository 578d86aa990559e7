//! Flapping penalty computation.

use std::collections::HashSet;
use std::sync::Arc;

use berth_id::TaskId;
use berth_model::TaskRecord;
use berth_storage::TaskStore;
use tracing::{debug, instrument, warn};

use crate::backoff::duration_ms;
use crate::RescheduleSettings;

/// Computes how long a rescheduled task should wait because its ancestors
/// were flapping.
///
/// Holds no state besides its collaborators, so one instance can serve every
/// scheduling thread.
#[derive(Clone)]
pub struct RescheduleCalculator {
    store: Arc<dyn TaskStore>,
    settings: RescheduleSettings,
}

impl RescheduleCalculator {
    pub fn new(store: Arc<dyn TaskStore>, settings: RescheduleSettings) -> Self {
        Self { store, settings }
    }

    pub fn settings(&self) -> &RescheduleSettings {
        &self.settings
    }

    /// Returns `true` if `task` died on its own within the flapping threshold.
    ///
    /// Tasks without history, and tasks that ever entered an interrupted
    /// status, are not flapping.
    pub fn is_flapping(&self, task: &TaskRecord) -> bool {
        if task.passed_through(self.settings.interrupted_statuses()) {
            return false;
        }

        let Some(lifetime_ms) = task.lifetime_ms() else {
            return false;
        };

        // Negative spans only come from clock skew; treat them as instant.
        let lifetime_ms = u64::try_from(lifetime_ms).unwrap_or(0);
        lifetime_ms < duration_ms(self.settings.flapping_threshold())
    }

    /// Penalty in milliseconds for scheduling `task`.
    ///
    /// Walks `ancestor_id` links while each ancestor is flapping, feeding the
    /// running penalty through the backoff strategy once per hop. Stops at a
    /// missing or non-flapping ancestor, or as soon as the backoff stops
    /// growing; in the last case the ancestors further up are never read.
    #[instrument(skip(self, task), fields(task_id = %task.task_id))]
    pub fn flapping_penalty_ms(&self, task: &TaskRecord) -> u64 {
        let mut penalty_ms = 0;
        let mut next_id: Option<TaskId> = task.ancestor_id.clone();
        let mut visited: HashSet<TaskId> = HashSet::new();

        while let Some(ancestor_id) = next_id.take() {
            if !visited.insert(ancestor_id.clone()) {
                warn!(ancestor_id = %ancestor_id, penalty_ms, "Ancestor cycle detected");
                return penalty_ms;
            }

            let Some(ancestor) = self.store.fetch_task(&ancestor_id) else {
                debug!(ancestor_id = %ancestor_id, penalty_ms, "Ancestor not found");
                return penalty_ms;
            };

            if !self.is_flapping(&ancestor) {
                debug!(ancestor_id = %ancestor_id, penalty_ms, "Ancestor not flapping");
                return penalty_ms;
            }

            let next_penalty_ms = self.settings.backoff().calculate_backoff_ms(penalty_ms);
            if next_penalty_ms <= penalty_ms {
                debug!(
                    ancestor_id = %ancestor_id,
                    penalty_ms = next_penalty_ms,
                    hops = visited.len(),
                    "Backoff converged, truncating ancestor walk"
                );
                return next_penalty_ms;
            }

            debug!(ancestor_id = %ancestor_id, penalty_ms = next_penalty_ms, "Flapping ancestor");
            penalty_ms = next_penalty_ms;
            next_id = ancestor.ancestor_id.clone();
        }

        penalty_ms
    }
}

impl std::fmt::Debug for RescheduleCalculator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RescheduleCalculator")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
