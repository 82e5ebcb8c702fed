//! Single-task operations for the HTTP layer
//!
//! Validates input before it reaches the store and maps store errors into
//! [`AppError`] so nothing store-specific escapes the service boundary.

use super::stats::TaskStats;
use super::store::TaskStore;
use super::types::{NewTask, Task, TaskPatch};
use crate::error::{AppError, Result};

#[derive(Clone)]
pub struct TaskService {
    store: TaskStore,
}

impl TaskService {
    pub fn new(store: TaskStore) -> Self {
        Self { store }
    }

    pub fn create(&self, input: NewTask) -> Result<Task> {
        if input.title.trim().is_empty() {
            return Err(AppError::BadRequest("Title is required".to_string()));
        }
        Ok(self.store.create(input)?)
    }

    pub fn get(&self, id: &str) -> Result<Task> {
        self.store
            .get(id)
            .ok_or_else(|| AppError::NotFound(format!("Task not found: {}", id)))
    }

    pub fn update(&self, id: &str, patch: TaskPatch, version: Option<u64>) -> Result<Task> {
        Ok(self.store.update(id, patch, version)?)
    }

    pub fn delete(&self, id: &str, version: Option<u64>) -> Result<()> {
        Ok(self.store.delete(id, version)?)
    }

    pub fn stats(&self, user_id: &str) -> TaskStats {
        self.store.stats(user_id)
    }

    /// Listing plus the user's `last_sync` from one read of the table
    pub fn list_with_last_sync(
        &self,
        user_id: &str,
        modified_since: Option<i64>,
    ) -> (Vec<Task>, i64) {
        self.store.list_with_last_sync(user_id, modified_since)
    }
}
