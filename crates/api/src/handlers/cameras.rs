//! Handlers for the `/cameras` resource and camera intrinsics.

use axum::extract::Path;
use axum::Json;
use fishsense_core::types::DbId;
use fishsense_db::models::camera::{Camera, CameraIntrinsics, SaveCamera, SaveCameraIntrinsics};
use fishsense_db::repositories::{CameraIntrinsicsRepo, CameraRepo};

use super::{created, Created};
use crate::error::{AppError, AppResult};
use crate::extract::{DbSession, NormalizedJson};

/// GET /api/v1/cameras/
pub async fn list_cameras(mut db: DbSession) -> AppResult<Json<Vec<Camera>>> {
    Ok(Json(CameraRepo::list(&mut db).await?))
}

/// GET /api/v1/cameras/{id}
pub async fn get_camera(mut db: DbSession, Path(id): Path<DbId>) -> AppResult<Json<Camera>> {
    CameraRepo::find_by_id(&mut db, id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("Camera", id))
}

/// PUT /api/v1/cameras/{id}
pub async fn put_camera(
    mut db: DbSession,
    Path(id): Path<DbId>,
    NormalizedJson(input): NormalizedJson<SaveCamera>,
) -> AppResult<Created> {
    let id = CameraRepo::upsert(&mut db, id, &input).await?;
    Ok(created(id))
}

/// GET /api/v1/cameras/{id}/intrinsics/
///
/// The camera's latest calibration.
pub async fn get_intrinsics(
    mut db: DbSession,
    Path(camera_id): Path<DbId>,
) -> AppResult<Json<CameraIntrinsics>> {
    CameraIntrinsicsRepo::find_current(&mut db, camera_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("Camera intrinsics", camera_id))
}

/// PUT /api/v1/cameras/{id}/intrinsics/
pub async fn put_intrinsics(
    mut db: DbSession,
    Path(camera_id): Path<DbId>,
    NormalizedJson(input): NormalizedJson<SaveCameraIntrinsics>,
) -> AppResult<Created> {
    let id = CameraIntrinsicsRepo::save(&mut db, camera_id, &input).await?;
    tracing::info!(camera_id, intrinsics_id = id, "Camera intrinsics saved");
    Ok(created(id))
}
