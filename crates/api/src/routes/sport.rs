use axum::routing::get;
use axum::Router;

use crate::handlers::sport;
use crate::state::AppState;

/// Sport routes mounted at `/sports`.
///
/// ```text
/// GET    /          -> list_sports
/// POST   /          -> create_sport
/// GET    /{id}      -> get_sport
/// PUT    /{id}      -> update_sport
/// DELETE /{id}      -> delete_sport
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(sport::list_sports).post(sport::create_sport))
        .route(
            "/{id}",
            get(sport::get_sport)
                .put(sport::update_sport)
                .delete(sport::delete_sport),
        )
}
