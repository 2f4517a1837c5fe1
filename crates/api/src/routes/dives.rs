//! Route definitions for the `/dives` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::dives;
use crate::state::AppState;

/// Routes for dives and their sub-resources.
///
/// ```text
/// GET    /dives/                              -> list_dives
/// GET    /dives/{id}                          -> get_dive
/// PUT    /dives/{id}                          -> put_dive
/// GET    /dives/{id}/images/                  -> list_dive_images
/// GET    /dives/{id}/laser-extrinsics         -> get_laser_extrinsics
/// POST   /dives/{id}/laser-extrinsics         -> create_laser_extrinsics
/// GET    /dives/{id}/images/clusters/         -> list_clusters
/// POST   /dives/{id}/images/clusters/         -> create_cluster
/// GET    /dives/{id}/images/clusters/{key}    -> list_clusters_by_source
/// PUT    /dives/{id}/images/clusters/{key}    -> put_cluster
/// GET    /dives/{id}/labels/{kind}            -> list_dive_labels
/// ```
///
/// `{key}` is a data source on GET and a cluster id on PUT.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/dives/", get(dives::list_dives))
        .route("/dives/{id}", get(dives::get_dive).put(dives::put_dive))
        .route("/dives/{id}/images/", get(dives::list_dive_images))
        .route(
            "/dives/{id}/laser-extrinsics",
            get(dives::get_laser_extrinsics).post(dives::create_laser_extrinsics),
        )
        .route(
            "/dives/{id}/images/clusters/",
            get(dives::list_clusters).post(dives::create_cluster),
        )
        .route(
            "/dives/{id}/images/clusters/{key}",
            get(dives::list_clusters_by_source).put(dives::put_cluster),
        )
        .route("/dives/{id}/labels/{kind}", get(dives::list_dive_labels))
}
