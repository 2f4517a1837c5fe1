use axum::routing::get;
use axum::Router;

use crate::handlers::images;
use crate::state::AppState;

/// ```text
/// GET    /images/{id}                   -> get_image
/// PUT    /images/{id}                   -> put_image
/// GET    /images/checksum/{checksum}    -> get_image_by_checksum
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/images/{id}", get(images::get_image).put(images::put_image))
        .route(
            "/images/checksum/{checksum}",
            get(images::get_image_by_checksum),
        )
}
