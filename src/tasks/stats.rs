//! Aggregate counts and the `lastSync` watermark

use serde::{Deserialize, Serialize};

use super::types::Task;

/// Per-user task counts
///
/// `last_sync` is the newest `updatedAt` among the user's tasks (0 when the
/// user has none). Clients send it back as `modifiedSince` on their next
/// incremental list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    pub last_sync: i64,
}

impl TaskStats {
    pub fn from_tasks<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Self {
        let mut stats = tasks.into_iter().fold(Self::default(), |mut acc, task| {
            acc.total += 1;
            if task.completed {
                acc.completed += 1;
            }
            acc.last_sync = acc.last_sync.max(task.updated_at);
            acc
        });
        stats.pending = stats.total - stats.completed;
        stats
    }
}
