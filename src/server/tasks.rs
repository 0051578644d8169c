//! Task endpoints.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::types::{
    DeletedTask, NewTask, PopulatedSession, Task, TaskListOptions, TaskListParams, TaskUpdate,
};

use super::{ApiError, AppState};

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

/// `POST /api/tasks`
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<NewTask>, JsonRejection>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let Json(request) = payload?;
    let task = state.db.create_task(request).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// `GET /api/tasks?completed&sortBy&order`
pub async fn list(
    State(state): State<AppState>,
    params: Result<Query<TaskListParams>, QueryRejection>,
) -> Result<Json<Vec<Task>>, ApiError> {
    let Query(params) = params?;
    let tasks = state
        .db
        .list_tasks(TaskListOptions::from_params(&params))
        .await?;
    Ok(Json(tasks))
}

/// `GET /api/tasks/search?q`
pub async fn search(
    State(state): State<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<Vec<Task>>, ApiError> {
    let Query(params) = params?;
    let query = params
        .q
        .filter(|q| !q.is_empty())
        .ok_or_else(|| ApiError::Validation("Search query 'q' is required".to_string()))?;
    Ok(Json(state.db.search_tasks(&query).await?))
}

/// `GET /api/tasks/{id}`
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Task>, ApiError> {
    Ok(Json(state.db.get_task(&id).await?))
}

/// `PUT /api/tasks/{id}`
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<TaskUpdate>, JsonRejection>,
) -> Result<Json<Task>, ApiError> {
    let Json(update) = payload?;
    Ok(Json(state.db.update_task(&id, update).await?))
}

/// `DELETE /api/tasks/{id}`
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeletedTask>, ApiError> {
    let task = state.db.delete_task(&id).await?;
    Ok(Json(DeletedTask::new(task)))
}

/// `GET /api/tasks/{id}/sessions`
pub async fn sessions(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<PopulatedSession>>, ApiError> {
    Ok(Json(state.db.sessions_for_task(&id).await?))
}
