//! Route handlers for the query surface
//!
//! Three read operations, each synchronous against the snapshot store:
//! a liveness probe plus the current course and conference snapshots.
//! Callers never see an error for cache reads - at most an empty array when
//! no successful refresh has happened yet for a source.

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::models::{Conference, Course};

use super::AppState;

/// Liveness probe payload
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/courses", get(list_courses))
        .route("/conferences", get(list_conferences))
        .with_state(state)
}

/// Liveness probe; always 200 while the process is up
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// Current course snapshot, full and unpaginated
async fn list_courses(State(state): State<AppState>) -> Json<Vec<Course>> {
    let courses = state.store.courses.get().await;
    tracing::debug!(count = courses.len(), "serving course snapshot");
    Json(courses)
}

/// Current conference snapshot, full and unpaginated
async fn list_conferences(State(state): State<AppState>) -> Json<Vec<Conference>> {
    let conferences = state.store.conferences.get().await;
    tracing::debug!(count = conferences.len(), "serving conference snapshot");
    Json(conferences)
}
