use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use berth_id::{JobKey, TaskId};
use berth_model::TaskRecord;
use tracing::debug;

use crate::TaskStore;

/// In-memory task store.
///
/// Records are shared as `Arc<TaskRecord>`, so reads never copy event
/// histories. Saving a record with an existing ID replaces it.
#[derive(Debug, Default)]
pub struct MemTaskStore {
    tasks: RwLock<HashMap<TaskId, Arc<TaskRecord>>>,
}

impl MemTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `tasks`.
    pub fn with_tasks<I>(tasks: I) -> Self
    where
        I: IntoIterator<Item = TaskRecord>,
    {
        let store = Self::new();
        store.save_tasks(tasks);
        store
    }

    /// Inserts or replaces tasks.
    pub fn save_tasks<I>(&self, tasks: I)
    where
        I: IntoIterator<Item = TaskRecord>,
    {
        let mut guard = self.write();
        let before = guard.len();
        for task in tasks {
            guard.insert(task.task_id.clone(), Arc::new(task));
        }
        debug!(added = guard.len() - before, total = guard.len(), "Saved tasks");
    }

    /// Removes tasks; unknown IDs are ignored.
    pub fn delete_tasks<'a, I>(&self, task_ids: I)
    where
        I: IntoIterator<Item = &'a TaskId>,
    {
        let mut guard = self.write();
        for id in task_ids {
            guard.remove(id);
        }
    }

    /// All tasks of `job`, in no particular order.
    pub fn fetch_tasks_by_job(&self, job: &JobKey) -> Vec<Arc<TaskRecord>> {
        self.read()
            .values()
            .filter(|t| t.job() == job)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    // Poisoning is ignored: every write leaves the map consistent.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<TaskId, Arc<TaskRecord>>> {
        self.tasks.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<TaskId, Arc<TaskRecord>>> {
        self.tasks.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl TaskStore for MemTaskStore {
    fn fetch_task(&self, task_id: &TaskId) -> Option<Arc<TaskRecord>> {
        self.read().get(task_id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use berth_model::{ScheduleStatus, TaskConfig};

    fn task(id: &str, job: &JobKey) -> TaskRecord {
        TaskRecord::new(
            TaskId::parse(id).unwrap(),
            0,
            TaskConfig::new(job.clone()),
            ScheduleStatus::Pending,
        )
    }

    #[test]
    fn test_save_fetch_delete() {
        let job = JobKey::new("role", "devel", "job").unwrap();
        let store = MemTaskStore::with_tasks([task("a", &job), task("b", &job)]);
        assert_eq!(store.len(), 2);

        let a = TaskId::parse("a").unwrap();
        assert_eq!(store.fetch_task(&a).unwrap().task_id, a);

        store.delete_tasks([&a]);
        assert!(store.fetch_task(&a).is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_save_replaces() {
        let job = JobKey::new("role", "devel", "job").unwrap();
        let store = MemTaskStore::new();
        store.save_tasks([task("a", &job)]);
        store.save_tasks([task("a", &job).with_status(ScheduleStatus::Running)]);

        let a = TaskId::parse("a").unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.fetch_task(&a).unwrap().status, ScheduleStatus::Running);
    }

    #[test]
    fn test_fetch_by_job() {
        let job = JobKey::new("role", "devel", "job").unwrap();
        let other = JobKey::new("role", "prod", "job").unwrap();
        let store = MemTaskStore::with_tasks([task("a", &job), task("b", &other)]);

        let tasks = store.fetch_tasks_by_job(&job);
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].task_id.as_str(), "a");
        assert!(store.fetch_tasks_by_job(&JobKey::new("x", "y", "z").unwrap()).is_empty());
    }

    #[test]
    fn test_shared_through_arc() {
        let job = JobKey::new("role", "devel", "job").unwrap();
        let store: Arc<dyn TaskStore> = Arc::new(MemTaskStore::with_tasks([task("a", &job)]));
        assert!(store.fetch_task(&TaskId::parse("a").unwrap()).is_some());
    }
}
