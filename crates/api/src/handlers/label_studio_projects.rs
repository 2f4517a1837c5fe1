use axum::extract::Path;
use axum::Json;
use fishsense_core::types::DbId;
use fishsense_db::models::label_studio_project::{LabelStudioProject, SaveLabelStudioProject};
use fishsense_db::repositories::LabelStudioProjectRepo;

use super::{created, Created};
use crate::error::{AppError, AppResult};
use crate::extract::{DbSession, NormalizedJson};

/// GET /api/v1/label-studio-projects/
pub async fn list_projects(mut db: DbSession) -> AppResult<Json<Vec<LabelStudioProject>>> {
    Ok(Json(LabelStudioProjectRepo::list(&mut db).await?))
}

/// GET /api/v1/label-studio-projects/{id}
pub async fn get_project(
    mut db: DbSession,
    Path(id): Path<DbId>,
) -> AppResult<Json<LabelStudioProject>> {
    LabelStudioProjectRepo::find_by_id(&mut db, id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("Label Studio project", id))
}

/// PUT /api/v1/label-studio-projects/{id}
pub async fn put_project(
    mut db: DbSession,
    Path(id): Path<DbId>,
    NormalizedJson(input): NormalizedJson<SaveLabelStudioProject>,
) -> AppResult<Created> {
    let id = LabelStudioProjectRepo::upsert(&mut db, id, &input).await?;
    Ok(created(id))
}
