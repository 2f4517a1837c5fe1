use axum::routing::get;
use axum::Router;

use crate::handlers::cameras;
use crate::state::AppState;

/// Routes for cameras and their intrinsics.
///
/// ```text
/// GET    /cameras/                  -> list_cameras
/// GET    /cameras/{id}              -> get_camera
/// PUT    /cameras/{id}              -> put_camera
/// GET    /cameras/{id}/intrinsics/  -> get_intrinsics
/// PUT    /cameras/{id}/intrinsics/  -> put_intrinsics
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/cameras/", get(cameras::list_cameras))
        .route(
            "/cameras/{id}",
            get(cameras::get_camera).put(cameras::put_camera),
        )
        .route(
            "/cameras/{id}/intrinsics/",
            get(cameras::get_intrinsics).put(cameras::put_intrinsics),
        )
}
