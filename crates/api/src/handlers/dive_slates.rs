use axum::extract::Path;
use axum::Json;
use fishsense_core::types::DbId;
use fishsense_db::models::dive_slate::{DiveSlate, SaveDiveSlate};
use fishsense_db::repositories::DiveSlateRepo;

use super::{created, Created};
use crate::error::{AppError, AppResult};
use crate::extract::{DbSession, NormalizedJson};

/// GET /api/v1/dive-slates/
pub async fn list_dive_slates(mut db: DbSession) -> AppResult<Json<Vec<DiveSlate>>> {
    Ok(Json(DiveSlateRepo::list(&mut db).await?))
}

/// GET /api/v1/dive-slates/{id}
pub async fn get_dive_slate(
    mut db: DbSession,
    Path(id): Path<DbId>,
) -> AppResult<Json<DiveSlate>> {
    DiveSlateRepo::find_by_id(&mut db, id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("Dive slate", id))
}

/// PUT /api/v1/dive-slates/{id}
pub async fn put_dive_slate(
    mut db: DbSession,
    Path(id): Path<DbId>,
    NormalizedJson(input): NormalizedJson<SaveDiveSlate>,
) -> AppResult<Created> {
    let id = DiveSlateRepo::upsert(&mut db, id, &input).await?;
    Ok(created(id))
}
