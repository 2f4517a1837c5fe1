use axum::routing::{get, post};
use axum::Router;

use crate::handlers::fish;
use crate::state::AppState;

/// Routes for fish, their measurements, and species.
///
/// ```text
/// GET    /fish/                            -> list_fish
/// POST   /fish                             -> save_fish
/// GET    /fish/{id}                        -> get_fish
/// GET    /fish/{id}/measurements           -> list_measurements
/// POST   /fish/{id}/measurements           -> save_measurement
/// GET    /fish/species/                    -> list_species
/// POST   /fish/species                     -> save_species
/// GET    /fish/species/{scientific_name}   -> get_species
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/fish/", get(fish::list_fish))
        .route("/fish", post(fish::save_fish))
        .route("/fish/{id}", get(fish::get_fish))
        .route(
            "/fish/{id}/measurements",
            get(fish::list_measurements).post(fish::save_measurement),
        )
        .route("/fish/species/", get(fish::list_species))
        .route("/fish/species", post(fish::save_species))
        .route("/fish/species/{scientific_name}", get(fish::get_species))
}
