//! Task API endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::extract::JsonBody;
use crate::error::Result;
use crate::state::AppState;
use crate::tasks::{now_millis, NewTask, Priority, Task, TaskPatch, DEFAULT_USER_ID};

/// Create the tasks router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_tasks).post(create_task))
        .route("/:id", get(get_task).put(update_task).delete(delete_task))
}

/// Query parameters for listing tasks
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    user_id: Option<String>,
    /// Only tasks changed strictly after this epoch-ms cursor
    modified_since: Option<i64>,
}

/// Query parameters for deleting a task
#[derive(Debug, Deserialize)]
pub struct DeleteParams {
    version: Option<u64>,
}

/// Request body for updating a task
#[derive(Debug, Deserialize)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
    pub priority: Option<Priority>,
    pub version: Option<u64>,
}

impl UpdateTaskRequest {
    fn into_parts(self) -> (TaskPatch, Option<u64>) {
        let patch = TaskPatch {
            title: self.title,
            description: self.description,
            completed: self.completed,
            priority: self.priority,
        };
        (patch, self.version)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskListResponse {
    pub success: bool,
    pub tasks: Vec<Task>,
    /// Watermark over all of the user's tasks, not just the returned ones
    pub last_sync: i64,
    pub server_time: i64,
}

#[derive(Debug, Serialize)]
pub struct TaskResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    pub task: Task,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: &'static str,
}

/// List a user's tasks, optionally only those changed since a cursor
async fn list_tasks(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<TaskListResponse>> {
    let user_id = params.user_id.as_deref().unwrap_or(DEFAULT_USER_ID);
    let (tasks, last_sync) = state
        .tasks()
        .list_with_last_sync(user_id, params.modified_since);

    tracing::debug!(
        user_id,
        modified_since = ?params.modified_since,
        count = tasks.len(),
        "Listed tasks"
    );

    Ok(Json(TaskListResponse {
        success: true,
        tasks,
        last_sync,
        server_time: now_millis(),
    }))
}

/// Get a specific task
async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TaskResponse>> {
    let task = state.tasks().get(&id)?;
    Ok(Json(TaskResponse {
        success: true,
        message: None,
        task,
    }))
}

/// Create a new task
async fn create_task(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<NewTask>,
) -> Result<(StatusCode, Json<TaskResponse>)> {
    let task = state.tasks().create(input)?;
    Ok((
        StatusCode::CREATED,
        Json(TaskResponse {
            success: true,
            message: Some("Task created"),
            task,
        }),
    ))
}

/// Update a task, guarded by the optional `version` in the body
async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(request): JsonBody<UpdateTaskRequest>,
) -> Result<Json<TaskResponse>> {
    let (patch, version) = request.into_parts();
    let task = state.tasks().update(&id, patch, version)?;
    Ok(Json(TaskResponse {
        success: true,
        message: Some("Task updated"),
        task,
    }))
}

/// Delete a task, guarded by the optional `version` query parameter
async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<DeleteParams>,
) -> Result<Json<MessageResponse>> {
    state.tasks().delete(&id, params.version)?;
    Ok(Json(MessageResponse {
        success: true,
        message: "Task deleted",
    }))
}
