//! Error types for the Tasksync server

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::tasks::Task;

/// Application-wide result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Machine-readable error kinds shared by HTTP responses and batch results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    Validation,
    NotFound,
    Conflict,
    MissingData,
    UnknownOperation,
    MalformedOperation,
    Internal,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::Validation => "VALIDATION",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::Conflict => "CONFLICT",
            ErrorCode::MissingData => "MISSING_DATA",
            ErrorCode::UnknownOperation => "UNKNOWN_OPERATION",
            ErrorCode::MalformedOperation => "MALFORMED_OPERATION",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

/// Errors raised by the task store
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("Task not found: {0}")]
    NotFound(String),

    /// The stored task does not match what the caller expected. The stored
    /// task is returned untouched so the client can reconcile.
    #[error("Version conflict on task {}: server is at version {}", .server_task.id, .server_task.version)]
    Conflict { server_task: Box<Task> },

    #[error("Validation failed: {0}")]
    Validation(String),
}

impl StoreError {
    pub fn code(&self) -> ErrorCode {
        match self {
            StoreError::NotFound(_) => ErrorCode::NotFound,
            StoreError::Conflict { .. } => ErrorCode::Conflict,
            StoreError::Validation(_) => ErrorCode::Validation,
        }
    }
}

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {message}")]
    Conflict {
        message: String,
        server_task: Box<Task>,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => AppError::NotFound(format!("Task not found: {}", id)),
            StoreError::Validation(msg) => AppError::BadRequest(msg),
            StoreError::Conflict { server_task } => AppError::Conflict {
                message: "Conflict detected".to_string(),
                server_task,
            },
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(status = %rejection.status(), "Rejected request body: {}", rejection.body_text());
        AppError::BadRequest(rejection.body_text())
    }
}

/// Error response body
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorResponse {
    success: bool,
    error: ErrorCode,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    conflict: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    server_task: Option<Box<Task>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let details = if cfg!(debug_assertions) {
            Some(self.to_string())
        } else {
            None
        };

        let (status, error, message, server_task) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ErrorCode::NotFound, msg, None),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ErrorCode::Validation, msg, None)
            }
            AppError::Conflict {
                message,
                server_task,
            } => (
                StatusCode::CONFLICT,
                ErrorCode::Conflict,
                message,
                Some(server_task),
            ),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::Internal,
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            success: false,
            error,
            message,
            conflict: server_task.as_ref().map(|_| true),
            server_task,
            details,
        });

        (status, body).into_response()
    }
}
