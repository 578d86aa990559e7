//! Test fixtures shared across berth crates.
//!
//! Panics freely: everything here is meant for `#[test]` code only.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, Once};

use berth_id::{JobKey, TaskId};
use berth_model::{
    Attribute, Constraint, ScheduleStatus, TaskConfig, TaskConstraint, TaskEvent, TaskRecord,
};
use berth_storage::{MemTaskStore, TaskStore};

/// Job used by fixtures unless a test picks its own.
pub fn job() -> JobKey {
    JobKey::new("role", "devel", "job").expect("fixture job key is valid")
}

/// Config carrying one negated value constraint and one limit constraint.
pub fn make_config(job: JobKey) -> TaskConfig {
    TaskConfig::new(job).with_constraints(vec![
        Constraint::new(
            "valueConstraint",
            TaskConstraint::value(true, ["value1", "value2"]),
        ),
        Constraint::new("limitConstraint", TaskConstraint::limit(5)),
    ])
}

/// A task of [`job`] with no ancestor and no events.
pub fn make_task(id: &str, status: ScheduleStatus) -> TaskRecord {
    TaskRecord::new(task_id(id), 0, make_config(job()), status)
}

/// Replaces the task's history; timestamps are milliseconds.
pub fn with_events(task: TaskRecord, events: &[(ScheduleStatus, i64)]) -> TaskRecord {
    task.with_events(
        events
            .iter()
            .map(|(status, ts)| TaskEvent::new(*status, *ts))
            .collect(),
    )
}

/// A task that ran and finished 300ms after it was created.
pub fn make_flappy_task(id: &str) -> TaskRecord {
    with_events(
        make_task(id, ScheduleStatus::Finished),
        &[
            (ScheduleStatus::Init, 0),
            (ScheduleStatus::Pending, 100),
            (ScheduleStatus::Running, 200),
            (ScheduleStatus::Finished, 300),
        ],
    )
}

pub fn task_id(id: &str) -> TaskId {
    TaskId::parse(id).expect("fixture task id is valid")
}

/// Host attributes from `(name, values)` pairs.
pub fn host(attributes: &[(&str, &[&str])]) -> Vec<Attribute> {
    attributes
        .iter()
        .map(|(name, values)| Attribute::new(*name, values.iter().copied()))
        .collect()
}

/// Task store that records every lookup and panics on forbidden IDs.
#[derive(Debug, Default)]
pub struct RecordingTaskStore {
    inner: MemTaskStore,
    lookups: Mutex<Vec<TaskId>>,
    forbidden: HashSet<TaskId>,
}

impl RecordingTaskStore {
    pub fn with_tasks<I>(tasks: I) -> Self
    where
        I: IntoIterator<Item = TaskRecord>,
    {
        Self {
            inner: MemTaskStore::with_tasks(tasks),
            ..Default::default()
        }
    }

    /// Any lookup of `id` fails the test.
    #[must_use]
    pub fn forbid(mut self, id: &str) -> Self {
        self.forbidden.insert(task_id(id));
        self
    }

    /// IDs looked up so far, in order.
    pub fn lookups(&self) -> Vec<TaskId> {
        self.lookups.lock().expect("lookup log poisoned").clone()
    }

    pub fn lookup_count(&self) -> usize {
        self.lookups.lock().expect("lookup log poisoned").len()
    }
}

impl TaskStore for RecordingTaskStore {
    fn fetch_task(&self, task_id: &TaskId) -> Option<Arc<TaskRecord>> {
        assert!(
            !self.forbidden.contains(task_id),
            "task {task_id} must not be queried"
        );
        self.lookups
            .lock()
            .expect("lookup log poisoned")
            .push(task_id.clone());
        self.inner.fetch_task(task_id)
    }
}

/// Installs a test-friendly tracing subscriber once per process.
///
/// Honors `RUST_LOG`; defaults to `debug` for the berth libraries.
pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            tracing_subscriber::EnvFilter::new(
                "berth_filter=debug,berth_reschedule=debug,berth_storage=debug",
            )
        });
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}
