//! Task storage as seen by scheduling decisions.
//!
//! Scheduling decisions only read tasks by ID. Writing, transactions, and
//! durability belong to the surrounding storage engine; [`MemTaskStore`] is
//! the in-process implementation used by tests and single-node setups.

mod memory;

use std::sync::Arc;

use berth_id::TaskId;
use berth_model::TaskRecord;

pub use memory::MemTaskStore;

/// Read access to task records by ID.
///
/// Each call must observe a coherent snapshot. Records may disappear at any
/// time (pruning), so callers treat `None` as a normal answer.
pub trait TaskStore: Send + Sync {
    fn fetch_task(&self, task_id: &TaskId) -> Option<Arc<TaskRecord>>;
}

impl<T: TaskStore + ?Sized> TaskStore for &T {
    fn fetch_task(&self, task_id: &TaskId) -> Option<Arc<TaskRecord>> {
        (**self).fetch_task(task_id)
    }
}

impl<T: TaskStore + ?Sized> TaskStore for Arc<T> {
    fn fetch_task(&self, task_id: &TaskId) -> Option<Arc<TaskRecord>> {
        (**self).fetch_task(task_id)
    }
}
