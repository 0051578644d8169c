//! Stats endpoint.

use axum::extract::State;
use axum::Json;

use crate::types::Stats;

use super::{ApiError, AppState};

/// `GET /api/stats`
pub async fn get(State(state): State<AppState>) -> Result<Json<Stats>, ApiError> {
    Ok(Json(state.db.stats().await?))
}
