use axum::routing::get;
use axum::Router;

use crate::handlers::dive_slates;
use crate::state::AppState;

/// ```text
/// GET    /dive-slates/       -> list_dive_slates
/// GET    /dive-slates/{id}   -> get_dive_slate
/// PUT    /dive-slates/{id}   -> put_dive_slate
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/dive-slates/", get(dive_slates::list_dive_slates))
        .route(
            "/dive-slates/{id}",
            get(dive_slates::get_dive_slate).put(dive_slates::put_dive_slate),
        )
}
