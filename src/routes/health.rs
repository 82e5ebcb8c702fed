//! Health check endpoints

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;
use crate::tasks::now_millis;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: i64,
    /// Seconds since startup
    pub uptime: f64,
    pub version: &'static str,
    pub service: &'static str,
}

pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        timestamp: now_millis(),
        uptime: state.uptime_secs(),
        version: env!("CARGO_PKG_VERSION"),
        service: "tasksync-server",
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(health_check))
}
