//! Task operations over a [`TaskStore`].
//!
//! The service is the single writer of the store: every call that touches it
//! runs under one lock, so a load-modify-save cycle never interleaves with
//! another caller's.

use std::sync::{Mutex, MutexGuard};

use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::store::{StoreError, TaskStore};
use crate::task::Task;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("load tasks: {0}")]
    Load(#[source] StoreError),
    #[error("save tasks: {0}")]
    Save(#[source] StoreError),
}

pub trait TaskService: Send + Sync {
    fn load_tasks(&self) -> Result<Vec<Task>, ServiceError>;
    fn save_tasks(&self, tasks: &[Task]) -> Result<(), ServiceError>;
    /// Flip `done` on the task with `id`. Unknown ids leave the store unchanged.
    fn toggle_completed(&self, id: Uuid) -> Result<(), ServiceError>;
    /// Remove the task with `id`. Unknown ids are not an error.
    fn delete_by_id(&self, id: Uuid) -> Result<(), ServiceError>;
    /// Replace the task with the same id, or append it.
    fn upsert_task(&self, task: Task) -> Result<(), ServiceError>;
    fn name(&self) -> &str;
}

/// [`TaskService`] backed by any [`TaskStore`], typically a file.
pub struct FileTaskService<S> {
    store: S,
    write_lock: Mutex<()>,
}

impl<S: TaskStore> FileTaskService<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        // The guarded value is (), so a poisoned lock carries no broken state.
        self.write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn modify(&self, f: impl FnOnce(&mut Vec<Task>)) -> Result<(), ServiceError> {
        let _guard = self.lock();
        let mut tasks = self.store.load().map_err(ServiceError::Load)?;
        f(&mut tasks);
        self.store.save(&tasks).map_err(ServiceError::Save)
    }
}

impl<S: TaskStore> TaskService for FileTaskService<S> {
    fn load_tasks(&self) -> Result<Vec<Task>, ServiceError> {
        let _guard = self.lock();
        self.store.load().map_err(ServiceError::Load)
    }

    fn save_tasks(&self, tasks: &[Task]) -> Result<(), ServiceError> {
        let _guard = self.lock();
        self.store.save(tasks).map_err(ServiceError::Save)
    }

    fn toggle_completed(&self, id: Uuid) -> Result<(), ServiceError> {
        self.modify(|tasks| {
            if let Some(task) = tasks.iter_mut().find(|t| t.id == id) {
                task.done = !task.done;
            }
        })
    }

    fn delete_by_id(&self, id: Uuid) -> Result<(), ServiceError> {
        self.modify(|tasks| {
            let before = tasks.len();
            tasks.retain(|t| t.id != id);
            if tasks.len() == before {
                debug!(%id, "delete of unknown task id");
            }
        })
    }

    fn upsert_task(&self, task: Task) -> Result<(), ServiceError> {
        self.modify(|tasks| match tasks.iter_mut().find(|t| t.id == task.id) {
            Some(existing) => *existing = task,
            None => tasks.push(task),
        })
    }

    fn name(&self) -> &str {
        self.store.name()
    }
}
