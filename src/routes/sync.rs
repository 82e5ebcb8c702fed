//! Sync API endpoints
//!
//! Provides the batch endpoint used by offline clients to push queued
//! operations, plus per-user stats used as the resync cursor.

use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::extract::JsonBody;
use crate::error::{AppError, Result};
use crate::state::AppState;
use crate::sync::BatchResult;
use crate::tasks::{TaskStats, DEFAULT_USER_ID};

/// Create the sync router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/batch", post(sync_batch))
        .route("/stats", get(get_stats))
}

/// Batch request body
///
/// Operations are kept as raw JSON so that one malformed entry fails alone.
#[derive(Debug, Deserialize)]
pub struct BatchRequest {
    #[serde(default)]
    pub operations: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsParams {
    user_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub success: bool,
    pub stats: TaskStats,
}

/// Apply a batch of queued client operations
async fn sync_batch(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<BatchRequest>,
) -> Result<Json<BatchResult>> {
    let operations = match request.operations {
        Value::Array(operations) => operations,
        _ => {
            return Err(AppError::BadRequest(
                "Operations must be an array".to_string(),
            ))
        }
    };

    Ok(Json(state.sync().process_batch(operations)))
}

/// Get task counts and the sync watermark for a user
async fn get_stats(
    State(state): State<AppState>,
    Query(params): Query<StatsParams>,
) -> Json<StatsResponse> {
    let user_id = params.user_id.as_deref().unwrap_or(DEFAULT_USER_ID);
    Json(StatsResponse {
        success: true,
        stats: state.tasks().stats(user_id),
    })
}
