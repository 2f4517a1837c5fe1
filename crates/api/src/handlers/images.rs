//! Handlers for the `/images` resource.

use axum::extract::Path;
use axum::Json;
use fishsense_core::types::DbId;
use fishsense_db::models::image::{Image, SaveImage};
use fishsense_db::repositories::ImageRepo;

use super::{created, Created};
use crate::error::{AppError, AppResult};
use crate::extract::{DbSession, NormalizedJson};

/// GET /api/v1/images/{id}
pub async fn get_image(mut db: DbSession, Path(id): Path<DbId>) -> AppResult<Json<Image>> {
    ImageRepo::find_by_id(&mut db, id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("Image", id))
}

/// GET /api/v1/images/checksum/{checksum}
pub async fn get_image_by_checksum(
    mut db: DbSession,
    Path(checksum): Path<String>,
) -> AppResult<Json<Image>> {
    ImageRepo::find_by_checksum(&mut db, &checksum)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("Image", checksum))
}

/// PUT /api/v1/images/{id}
pub async fn put_image(
    mut db: DbSession,
    Path(id): Path<DbId>,
    NormalizedJson(input): NormalizedJson<SaveImage>,
) -> AppResult<Created> {
    let id = ImageRepo::upsert(&mut db, id, &input).await?;
    Ok(created(id))
}
