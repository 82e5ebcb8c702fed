//! Sync data types
//!
//! Defines the batch protocol:
//! - Operations submitted by offline clients
//! - Per-operation outcomes
//! - The batch envelope returned to the client

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::error::{ErrorCode, StoreError};
use crate::tasks::Task;

/// Types of sync operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Create,
    Update,
    Delete,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Create => "CREATE",
            OperationKind::Update => "UPDATE",
            OperationKind::Delete => "DELETE",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown operation type: {0}")]
pub struct UnknownOperation(pub String);

impl FromStr for OperationKind {
    type Err = UnknownOperation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CREATE" => Ok(OperationKind::Create),
            "UPDATE" => Ok(OperationKind::Update),
            "DELETE" => Ok(OperationKind::Delete),
            other => Err(UnknownOperation(other.to_string())),
        }
    }
}

/// A client operation as submitted in a batch
///
/// `kind` stays a raw string so an unrecognised type is reported on that
/// operation alone instead of rejecting the whole request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncOperation {
    #[serde(rename = "type")]
    pub kind: String,
    /// Client-side operation id, echoed back untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub task_id: String,
    /// `NewTask` for CREATE, `TaskPatch` for UPDATE
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// Version the client last saw; omitted means unconditional
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u64>,
}

/// Outcome of one operation in a batch
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationResult {
    /// The operation exactly as the client sent it
    pub operation: Value,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task: Option<Task>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<ErrorCode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conflict: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_task: Option<Task>,
}

impl OperationResult {
    pub fn applied(operation: Value, task: Option<Task>) -> Self {
        Self {
            operation,
            success: true,
            task,
            error: None,
            code: None,
            conflict: None,
            server_task: None,
        }
    }

    pub fn failed(operation: Value, code: ErrorCode, error: impl Into<String>) -> Self {
        Self {
            operation,
            success: false,
            task: None,
            error: Some(error.into()),
            code: Some(code),
            conflict: None,
            server_task: None,
        }
    }

    pub fn from_store_error(operation: Value, err: StoreError) -> Self {
        let mut result = Self::failed(operation, err.code(), err.to_string());
        match err {
            StoreError::Conflict { server_task } => {
                result.conflict = Some(true);
                result.server_task = Some(*server_task);
            }
            StoreError::NotFound(_) => result.conflict = Some(false),
            StoreError::Validation(_) => {}
        }
        result
    }

    pub fn is_conflict(&self) -> bool {
        self.conflict == Some(true)
    }
}

/// Response for a batch
///
/// `success` reports that the batch was accepted. Individual operations can
/// still have failed; callers must look at every entry in `results`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResult {
    pub success: bool,
    pub results: Vec<OperationResult>,
    pub server_time: i64,
}
