//! Batch application
//!
//! Operations are applied one at a time in submission order, so operations
//! on the same task within a batch see the version left by the previous one.
//! A failing operation is recorded in its own result and never stops the
//! rest of the batch.

use serde_json::Value;

use super::types::{BatchResult, OperationKind, OperationResult, SyncOperation};
use crate::error::{ErrorCode, StoreError};
use crate::tasks::{now_millis, NewTask, Task, TaskPatch, TaskStore};

/// Why a single operation did not apply
enum Failure {
    Local { code: ErrorCode, message: String },
    Store(StoreError),
}

impl Failure {
    fn missing_data(kind: OperationKind) -> Self {
        Failure::Local {
            code: ErrorCode::MissingData,
            message: format!("Missing data for {}", kind.as_str()),
        }
    }

    fn invalid_data(kind: OperationKind, err: serde_json::Error) -> Self {
        Failure::Local {
            code: ErrorCode::MalformedOperation,
            message: format!("Invalid data for {}: {}", kind.as_str(), err),
        }
    }
}

impl From<StoreError> for Failure {
    fn from(err: StoreError) -> Self {
        Failure::Store(err)
    }
}

/// Applies client batches against the task store
#[derive(Clone)]
pub struct SyncEngine {
    store: TaskStore,
}

impl SyncEngine {
    pub fn new(store: TaskStore) -> Self {
        Self { store }
    }

    /// Apply every operation and report one result per operation
    pub fn process_batch(&self, operations: Vec<Value>) -> BatchResult {
        let results: Vec<OperationResult> = operations
            .into_iter()
            .map(|raw| self.process_operation(raw))
            .collect();

        let applied = results.iter().filter(|r| r.success).count();
        let conflicts = results.iter().filter(|r| r.is_conflict()).count();
        tracing::info!(
            operations = results.len(),
            applied,
            failed = results.len() - applied,
            conflicts,
            "Processed sync batch"
        );

        BatchResult {
            success: true,
            results,
            server_time: now_millis(),
        }
    }

    fn process_operation(&self, raw: Value) -> OperationResult {
        let op: SyncOperation = match serde_json::from_value(raw.clone()) {
            Ok(op) => op,
            Err(e) => {
                tracing::debug!("Malformed sync operation: {}", e);
                return OperationResult::failed(
                    raw,
                    ErrorCode::MalformedOperation,
                    format!("Malformed operation: {}", e),
                );
            }
        };

        let kind = match op.kind.parse::<OperationKind>() {
            Ok(kind) => kind,
            Err(e) => return OperationResult::failed(raw, ErrorCode::UnknownOperation, e.to_string()),
        };

        tracing::debug!(task_id = %op.task_id, ?kind, version = ?op.version, "Applying sync operation");

        let outcome = match kind {
            OperationKind::Create => self.apply_create(op),
            OperationKind::Update => self.apply_update(op),
            OperationKind::Delete => self.apply_delete(op),
        };

        match outcome {
            Ok(task) => OperationResult::applied(raw, task),
            Err(Failure::Local { code, message }) => OperationResult::failed(raw, code, message),
            Err(Failure::Store(err)) => OperationResult::from_store_error(raw, err),
        }
    }

    fn apply_create(&self, op: SyncOperation) -> Result<Option<Task>, Failure> {
        let data = op
            .data
            .ok_or_else(|| Failure::missing_data(OperationKind::Create))?;
        let input: NewTask = serde_json::from_value(data)
            .map_err(|e| Failure::invalid_data(OperationKind::Create, e))?;

        Ok(Some(self.store.create(input)?))
    }

    fn apply_update(&self, op: SyncOperation) -> Result<Option<Task>, Failure> {
        let data = op
            .data
            .ok_or_else(|| Failure::missing_data(OperationKind::Update))?;
        let patch: TaskPatch = serde_json::from_value(data)
            .map_err(|e| Failure::invalid_data(OperationKind::Update, e))?;

        Ok(Some(self.store.update(&op.task_id, patch, op.version)?))
    }

    fn apply_delete(&self, op: SyncOperation) -> Result<Option<Task>, Failure> {
        self.store.delete(&op.task_id, op.version)?;
        Ok(None)
    }
}
