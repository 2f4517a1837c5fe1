//! Handlers for `/labels/{kind}`.
//!
//! The four label kinds share one set of routes; the `kind` path segment
//! selects the repository and the body schema.

use axum::extract::rejection::JsonRejection;
use axum::extract::Path;
use axum::response::{IntoResponse, Response};
use axum::Json;
use fishsense_core::types::DbId;
use fishsense_db::models::label::{
    LabelKind, SaveDiveSlateLabel, SaveHeadTailLabel, SaveLaserLabel, SaveSpeciesLabel,
};
use fishsense_db::repositories::{
    DiveSlateLabelRepo, HeadTailLabelRepo, LaserLabelRepo, SpeciesLabelRepo,
};

use super::{created, Created};
use crate::error::{AppError, AppResult};
use crate::extract::{decode_record, DbSession};

/// GET /api/v1/labels/{kind}/{image_id}
///
/// The authoritative label of an image.
pub async fn get_label(
    mut db: DbSession,
    Path((kind, image_id)): Path<(LabelKind, DbId)>,
) -> AppResult<Response> {
    let found = match kind {
        LabelKind::Laser => LaserLabelRepo::find_current_by_image(&mut db, image_id)
            .await?
            .map(|label| Json(label).into_response()),
        LabelKind::HeadTail => HeadTailLabelRepo::find_current_by_image(&mut db, image_id)
            .await?
            .map(|label| Json(label).into_response()),
        LabelKind::Species => SpeciesLabelRepo::find_current_by_image(&mut db, image_id)
            .await?
            .map(|label| Json(label).into_response()),
        LabelKind::DiveSlate => DiveSlateLabelRepo::find_current_by_image(&mut db, image_id)
            .await?
            .map(|label| Json(label).into_response()),
    };
    found.ok_or_else(|| AppError::not_found(kind.entity(), image_id))
}

/// GET /api/v1/labels/{kind}/label-studio/{task_id}
pub async fn get_label_by_task(
    mut db: DbSession,
    Path((kind, task_id)): Path<(LabelKind, i64)>,
) -> AppResult<Response> {
    let found = match kind {
        LabelKind::Laser => LaserLabelRepo::find_by_task_id(&mut db, task_id)
            .await?
            .map(|label| Json(label).into_response()),
        LabelKind::HeadTail => HeadTailLabelRepo::find_by_task_id(&mut db, task_id)
            .await?
            .map(|label| Json(label).into_response()),
        LabelKind::Species => SpeciesLabelRepo::find_by_task_id(&mut db, task_id)
            .await?
            .map(|label| Json(label).into_response()),
        LabelKind::DiveSlate => DiveSlateLabelRepo::find_by_task_id(&mut db, task_id)
            .await?
            .map(|label| Json(label).into_response()),
    };
    found.ok_or_else(|| AppError::not_found(kind.entity(), task_id))
}

/// PUT /api/v1/labels/{kind}/{image_id} (also accepted as POST)
///
/// Upserts by the body's `id`; without one a new label is inserted.
pub async fn save_label(
    mut db: DbSession,
    Path((kind, image_id)): Path<(LabelKind, DbId)>,
    payload: Result<Json<serde_json::Value>, JsonRejection>,
) -> AppResult<Created> {
    let Json(raw) = payload.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

    let id = match kind {
        LabelKind::Laser => {
            let input: SaveLaserLabel = decode_record(raw)?;
            LaserLabelRepo::save(&mut db, image_id, &input).await?
        }
        LabelKind::HeadTail => {
            let input: SaveHeadTailLabel = decode_record(raw)?;
            HeadTailLabelRepo::save(&mut db, image_id, &input).await?
        }
        LabelKind::Species => {
            let input: SaveSpeciesLabel = decode_record(raw)?;
            SpeciesLabelRepo::save(&mut db, image_id, &input).await?
        }
        LabelKind::DiveSlate => {
            let input: SaveDiveSlateLabel = decode_record(raw)?;
            DiveSlateLabelRepo::save(&mut db, image_id, &input).await?
        }
    };
    tracing::info!(kind = %kind, image_id, label_id = id, "Label saved");
    Ok(created(id))
}
