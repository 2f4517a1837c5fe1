//! Handlers for `/fish`, their measurements, and `/fish/species`.

use axum::extract::Path;
use axum::Json;
use fishsense_core::types::DbId;
use fishsense_db::models::fish::{
    Fish, Measurement, SaveFish, SaveMeasurement, SaveSpecies, Species,
};
use fishsense_db::repositories::{FishRepo, MeasurementRepo, SpeciesRepo};

use super::{created, Created};
use crate::error::{AppError, AppResult};
use crate::extract::{DbSession, NormalizedJson};

// ---------------------------------------------------------------------------
// Fish
// ---------------------------------------------------------------------------

/// GET /api/v1/fish/
pub async fn list_fish(mut db: DbSession) -> AppResult<Json<Vec<Fish>>> {
    Ok(Json(FishRepo::list(&mut db).await?))
}

/// GET /api/v1/fish/{id}
pub async fn get_fish(mut db: DbSession, Path(id): Path<DbId>) -> AppResult<Json<Fish>> {
    FishRepo::find_by_id(&mut db, id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("Fish", id))
}

/// POST /api/v1/fish
///
/// Inserts, or merges onto the body's `id` when present.
pub async fn save_fish(
    mut db: DbSession,
    NormalizedJson(input): NormalizedJson<SaveFish>,
) -> AppResult<Created> {
    let id = FishRepo::save(&mut db, &input).await?;
    Ok(created(id))
}

// ---------------------------------------------------------------------------
// Measurements
// ---------------------------------------------------------------------------

/// GET /api/v1/fish/{id}/measurements
pub async fn list_measurements(
    mut db: DbSession,
    Path(fish_id): Path<DbId>,
) -> AppResult<Json<Vec<Measurement>>> {
    Ok(Json(MeasurementRepo::list_by_fish(&mut db, fish_id).await?))
}

/// POST /api/v1/fish/{id}/measurements
pub async fn save_measurement(
    mut db: DbSession,
    Path(fish_id): Path<DbId>,
    NormalizedJson(input): NormalizedJson<SaveMeasurement>,
) -> AppResult<Created> {
    let id = MeasurementRepo::save(&mut db, fish_id, &input).await?;
    Ok(created(id))
}

// ---------------------------------------------------------------------------
// Species
// ---------------------------------------------------------------------------

/// GET /api/v1/fish/species/
pub async fn list_species(mut db: DbSession) -> AppResult<Json<Vec<Species>>> {
    Ok(Json(SpeciesRepo::list(&mut db).await?))
}

/// GET /api/v1/fish/species/{scientific_name}
pub async fn get_species(
    mut db: DbSession,
    Path(scientific_name): Path<String>,
) -> AppResult<Json<Species>> {
    SpeciesRepo::find_by_scientific_name(&mut db, &scientific_name)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("Species", scientific_name))
}

/// POST /api/v1/fish/species
pub async fn save_species(
    mut db: DbSession,
    NormalizedJson(input): NormalizedJson<SaveSpecies>,
) -> AppResult<Created> {
    let id = SpeciesRepo::save(&mut db, &input).await?;
    Ok(created(id))
}
