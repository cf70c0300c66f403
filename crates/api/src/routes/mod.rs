pub mod health;
pub mod ski_lift;
pub mod sport;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /sports                 list, create
/// /sports/{id}            get, update, delete
///
/// /ski-lifts              list, create
/// /ski-lifts/{id}         get, update, delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/sports", sport::router())
        .nest("/ski-lifts", ski_lift::router())
}
