//! In-memory task table
//!
//! The store is the single source of truth for tasks. Update and delete use
//! compare-and-swap on `version`: the load, the comparison and the write all
//! happen under one write-lock acquisition, so two writers holding the same
//! stale version can never both succeed.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use super::stats::TaskStats;
use super::types::{generate_task_id, now_millis, NewTask, Task, TaskPatch, DEFAULT_USER_ID};
use crate::error::StoreError;

/// Write policy knobs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorePolicy {
    /// Reject update/delete requests that carry no expected version
    pub require_version: bool,
    /// Accept caller-supplied ids on create (offline-created tasks)
    pub allow_client_id: bool,
    /// Answer a create for an existing id with a conflict instead of
    /// overwriting the stored task
    pub reject_duplicate_ids: bool,
}

impl Default for StorePolicy {
    fn default() -> Self {
        Self {
            require_version: false,
            allow_client_id: true,
            reject_duplicate_ids: true,
        }
    }
}

/// Shared handle to the task table
#[derive(Clone, Default)]
pub struct TaskStore {
    tasks: Arc<RwLock<HashMap<String, Task>>>,
    policy: StorePolicy,
}

impl TaskStore {
    /// Create an empty store with the default policy
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store with a custom policy
    pub fn with_policy(policy: StorePolicy) -> Self {
        Self {
            tasks: Arc::new(RwLock::new(HashMap::new())),
            policy,
        }
    }

    /// Create a task at version 1
    pub fn create(&self, input: NewTask) -> Result<Task, StoreError> {
        let title = validate_title(&input.title)?;

        let client_id = input.id.filter(|id| !id.trim().is_empty());
        if client_id.is_some() && !self.policy.allow_client_id {
            return Err(StoreError::Validation(
                "Client-supplied task ids are not accepted".to_string(),
            ));
        }

        let now = now_millis();
        let mut tasks = self.tasks.write();

        let id = match client_id {
            Some(id) => {
                if let Some(existing) = tasks.get(&id) {
                    if self.policy.reject_duplicate_ids {
                        tracing::info!(task_id = %id, "Rejected create for existing task id");
                        return Err(StoreError::Conflict {
                            server_task: Box::new(existing.clone()),
                        });
                    }
                    tracing::warn!(task_id = %id, "Create is overwriting an existing task");
                }
                id
            }
            None => generate_task_id(),
        };

        let task = Task {
            id,
            title,
            description: input
                .description
                .map(|d| d.trim().to_string())
                .unwrap_or_default(),
            completed: false,
            priority: input.priority.unwrap_or_default(),
            user_id: input.user_id.unwrap_or_else(|| DEFAULT_USER_ID.to_string()),
            created_at: input.created_at.filter(|t| *t > 0).unwrap_or(now),
            updated_at: now,
            version: 1,
        };

        tasks.insert(task.id.clone(), task.clone());

        tracing::debug!(task_id = %task.id, user_id = %task.user_id, "Created task");

        Ok(task)
    }

    /// Get a snapshot of a task
    pub fn get(&self, id: &str) -> Option<Task> {
        self.tasks.read().get(id).cloned()
    }

    /// List a user's tasks, most recently changed first
    ///
    /// A positive `modified_since` keeps only tasks with `updated_at`
    /// strictly greater than it.
    pub fn list(&self, user_id: &str, modified_since: Option<i64>) -> Vec<Task> {
        list_owned(&self.tasks.read(), user_id, modified_since)
    }

    /// [`TaskStore::list`] together with the user's `last_sync`, both read
    /// from the same snapshot of the table
    pub fn list_with_last_sync(
        &self,
        user_id: &str,
        modified_since: Option<i64>,
    ) -> (Vec<Task>, i64) {
        let tasks = self.tasks.read();
        let last_sync =
            TaskStats::from_tasks(tasks.values().filter(|task| task.user_id == user_id)).last_sync;

        (list_owned(&tasks, user_id, modified_since), last_sync)
    }

    /// Apply a partial update
    ///
    /// With `expected_version` set, the update only goes through if it matches
    /// the stored version; otherwise the stored task comes back in a
    /// [`StoreError::Conflict`] untouched.
    pub fn update(
        &self,
        id: &str,
        patch: TaskPatch,
        expected_version: Option<u64>,
    ) -> Result<Task, StoreError> {
        let mut tasks = self.tasks.write();

        let current = tasks
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        check_version(&self.policy, current, expected_version)?;

        if let Some(title) = &patch.title {
            validate_title(title)?;
        }

        patch.apply_to(current);
        current.updated_at = now_millis().max(current.updated_at);
        current.version += 1;

        tracing::debug!(task_id = %id, version = current.version, "Updated task");

        Ok(current.clone())
    }

    /// Remove a task, under the same version check as [`TaskStore::update`]
    pub fn delete(&self, id: &str, expected_version: Option<u64>) -> Result<(), StoreError> {
        let mut tasks = self.tasks.write();

        let current = tasks
            .get(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        check_version(&self.policy, current, expected_version)?;

        tasks.remove(id);

        tracing::debug!(task_id = %id, "Deleted task");

        Ok(())
    }

    /// Counts and sync watermark for a user
    pub fn stats(&self, user_id: &str) -> TaskStats {
        let tasks = self.tasks.read();
        TaskStats::from_tasks(tasks.values().filter(|task| task.user_id == user_id))
    }

    pub fn len(&self) -> usize {
        self.tasks.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.read().is_empty()
    }
}

fn list_owned(
    tasks: &HashMap<String, Task>,
    user_id: &str,
    modified_since: Option<i64>,
) -> Vec<Task> {
    let since = modified_since.filter(|since| *since > 0);

    let mut owned: Vec<Task> = tasks
        .values()
        .filter(|task| task.user_id == user_id)
        .filter(|task| since.map_or(true, |since| task.updated_at > since))
        .cloned()
        .collect();

    owned.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    owned
}

fn validate_title(title: &str) -> Result<String, StoreError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(StoreError::Validation("Title is required".to_string()));
    }
    Ok(title.to_string())
}

fn check_version(
    policy: &StorePolicy,
    current: &Task,
    expected_version: Option<u64>,
) -> Result<(), StoreError> {
    match expected_version {
        Some(expected) if expected != current.version => {
            tracing::info!(
                task_id = %current.id,
                expected,
                actual = current.version,
                "Version conflict"
            );
            Err(StoreError::Conflict {
                server_task: Box::new(current.clone()),
            })
        }
        None if policy.require_version => Err(StoreError::Validation(
            "A version is required for this operation".to_string(),
        )),
        _ => Ok(()),
    }
}
