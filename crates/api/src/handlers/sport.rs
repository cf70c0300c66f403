//! Handlers for the `/sports` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use skiadmin_core::types::DbId;

use crate::error::AppResult;
use crate::requests::SportRequest;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/sports
pub async fn list_sports(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let sports = state.services.sports.list().await?;
    Ok(Json(DataResponse { data: sports }))
}

/// POST /api/v1/sports
///
/// Returns 201 with the stored sport, including its assigned id.
pub async fn create_sport(
    State(state): State<AppState>,
    Json(input): Json<SportRequest>,
) -> AppResult<impl IntoResponse> {
    let sport = input.into_sport(None)?;
    let created = state.services.sports.create(&sport).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

/// GET /api/v1/sports/{id}
pub async fn get_sport(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let sport = state.services.sports.get(id).await?;
    Ok(Json(DataResponse { data: sport }))
}

/// PUT /api/v1/sports/{id}
///
/// Full replacement: omitted optional fields fall back to their defaults.
pub async fn update_sport(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<SportRequest>,
) -> AppResult<impl IntoResponse> {
    let sport = input.into_sport(Some(id))?;
    let updated = state.services.sports.update(&sport).await?;
    Ok(Json(DataResponse { data: updated }))
}

/// DELETE /api/v1/sports/{id}
///
/// Fails while any ski lift still offers the sport.
pub async fn delete_sport(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    state.services.sports.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
