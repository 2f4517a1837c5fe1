pub mod cameras;
pub mod dive_slates;
pub mod dives;
pub mod docs;
pub mod fish;
pub mod health;
pub mod images;
pub mod label_studio_projects;
pub mod labels;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /cameras/                                        list
/// /cameras/{id}                                    get, upsert (PUT)
/// /cameras/{id}/intrinsics/                        current, upsert (PUT)
///
/// /dive-slates/                                    list
/// /dive-slates/{id}                                get, upsert (PUT)
///
/// /dives/                                          list
/// /dives/{id}                                      get, upsert (PUT)
/// /dives/{id}/images/                              images of the dive
/// /dives/{id}/laser-extrinsics                     current, record new (POST)
/// /dives/{id}/images/clusters/                     list, create (POST)
/// /dives/{id}/images/clusters/{data_source}        list by provenance (GET)
/// /dives/{id}/images/clusters/{cluster_id}         upsert, replace members (PUT)
/// /dives/{id}/labels/{kind}                        labels of the dive's images
///
/// /images/{id}                                     get, upsert (PUT)
/// /images/checksum/{checksum}                      get by checksum
///
/// /fish/                                           list
/// /fish                                            create or merge (POST)
/// /fish/{id}                                       get
/// /fish/{id}/measurements                          list, create or merge (POST)
/// /fish/species/                                   list
/// /fish/species                                    create or merge (POST)
/// /fish/species/{scientific_name}                  get
///
/// /users/                                          list, create (POST)
/// /users/{id}                                      get, upsert (PUT)
/// /users/email/{email}                             get by email
/// /users/label-studio/{label_studio_id}            get by Label Studio id
///
/// /label-studio-projects/                          list
/// /label-studio-projects/{id}                      get, upsert (PUT)
///
/// /labels/{kind}/{image_id}                        authoritative label, save (PUT/POST)
/// /labels/{kind}/label-studio/{task_id}            get by Label Studio task
/// ```
///
/// `kind` is one of `laser`, `head-tail`, `species`, `dive-slate`.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(cameras::router())
        .merge(dive_slates::router())
        .merge(dives::router())
        .merge(images::router())
        .merge(fish::router())
        .merge(users::router())
        .merge(label_studio_projects::router())
        .merge(labels::router())
}
