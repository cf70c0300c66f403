//! Handlers for the `/ski-lifts` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use skiadmin_core::types::DbId;

use crate::error::AppResult;
use crate::requests::SkiLiftRequest;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/ski-lifts
pub async fn list_ski_lifts(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let lifts = state.services.ski_lifts.list().await?;
    Ok(Json(DataResponse { data: lifts }))
}

/// POST /api/v1/ski-lifts
///
/// Every id in `available_sports` must name an existing sport.
pub async fn create_ski_lift(
    State(state): State<AppState>,
    Json(input): Json<SkiLiftRequest>,
) -> AppResult<impl IntoResponse> {
    let lift = input.into_ski_lift(None)?;
    let created = state.services.ski_lifts.create(&lift).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

/// GET /api/v1/ski-lifts/{id}
pub async fn get_ski_lift(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let lift = state.services.ski_lifts.get(id).await?;
    Ok(Json(DataResponse { data: lift }))
}

/// PUT /api/v1/ski-lifts/{id}
///
/// Replaces the lift's fields and its sport associations.
pub async fn update_ski_lift(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<SkiLiftRequest>,
) -> AppResult<impl IntoResponse> {
    let lift = input.into_ski_lift(Some(id))?;
    let updated = state.services.ski_lifts.update(&lift).await?;
    Ok(Json(DataResponse { data: updated }))
}

/// DELETE /api/v1/ski-lifts/{id}
pub async fn delete_ski_lift(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    state.services.ski_lifts.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
