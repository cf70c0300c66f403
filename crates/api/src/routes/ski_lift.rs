use axum::routing::get;
use axum::Router;

use crate::handlers::ski_lift;
use crate::state::AppState;

/// Ski lift routes mounted at `/ski-lifts`.
///
/// ```text
/// GET    /          -> list_ski_lifts
/// POST   /          -> create_ski_lift
/// GET    /{id}      -> get_ski_lift
/// PUT    /{id}      -> update_ski_lift
/// DELETE /{id}      -> delete_ski_lift
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(ski_lift::list_ski_lifts).post(ski_lift::create_ski_lift))
        .route(
            "/{id}",
            get(ski_lift::get_ski_lift)
                .put(ski_lift::update_ski_lift)
                .delete(ski_lift::delete_ski_lift),
        )
}
