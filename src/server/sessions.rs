//! Session endpoints.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;

use crate::types::{NewSession, PopulatedSession, Session, SessionListParams};

use super::{ApiError, AppState};

/// `POST /api/sessions`
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<NewSession>, JsonRejection>,
) -> Result<(StatusCode, Json<Session>), ApiError> {
    let Json(request) = payload?;
    let session = state.db.create_session(request).await?;
    Ok((StatusCode::CREATED, Json(session)))
}

/// `GET /api/sessions?sortBy&order`
pub async fn list(
    State(state): State<AppState>,
    params: Result<Query<SessionListParams>, QueryRejection>,
) -> Result<Json<Vec<PopulatedSession>>, ApiError> {
    let Query(params) = params?;
    Ok(Json(state.db.list_sessions(params.sort()).await?))
}
