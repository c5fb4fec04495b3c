use std::path::Path as FsPath;

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query};
use axum::routing::put;
use axum::{Router, extract::State, http::StatusCode, routing::get};
use serde::{Deserialize, Serialize};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::debug;

use crate::error::AppError;
use crate::models::*;
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub ok: bool,
}

/// JSON API routes only.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/tasks", get(list_tasks).post(create_task))
        .route("/api/tasks/{id}", put(update_task).delete(delete_task))
        .with_state(state)
}

/// The API plus the browser client served from `static_dir`.
pub fn app(state: AppState, static_dir: impl AsRef<FsPath>) -> Router {
    router(state)
        .fallback_service(ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
}

async fn health(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state.store.ping().await?;
    Ok(StatusCode::OK)
}

async fn list_tasks(
    State(state): State<AppState>,
    params: Result<Query<ListTasksParams>, QueryRejection>,
) -> Result<Json<Vec<Task>>, AppError> {
    let Query(params) = params?;
    let filter = TaskFilter::try_from(params)?;
    let tasks = state.store.list_tasks(&filter).await?;
    Ok(Json(tasks))
}

async fn create_task(
    State(state): State<AppState>,
    req: Result<Json<NewTaskRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Task>), AppError> {
    let Json(req) = req?;
    let task = state.store.create_task(NewTask::try_from(req)?).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

async fn update_task(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    req: Result<Json<UpdateTaskRequest>, JsonRejection>,
) -> Result<Json<Task>, AppError> {
    let Path(id) = id?;
    let Json(req) = req?;
    let changes = TaskChanges::try_from(req)?;
    let task = state
        .store
        .update_task(id, changes)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(task))
}

async fn delete_task(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<DeleteResponse>, AppError> {
    let Path(id) = id?;
    if !state.store.delete_task(id).await? {
        debug!(id, "delete of missing task");
    }
    Ok(Json(DeleteResponse { ok: true }))
}
