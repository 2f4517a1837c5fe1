//! Handlers for the `/dives` resource and its sub-resources: images, laser
//! extrinsics, frame clusters and per-dive label listings.

use axum::extract::Path;
use axum::response::{IntoResponse, Response};
use axum::Json;
use fishsense_core::error::CoreError;
use fishsense_core::types::DbId;
use fishsense_db::models::data_source::DataSource;
use fishsense_db::models::dive::{CreateLaserExtrinsics, Dive, LaserExtrinsics, SaveDive};
use fishsense_db::models::dive_frame_cluster::{DiveFrameClusterJson, SaveDiveFrameCluster};
use fishsense_db::models::image::Image;
use fishsense_db::models::label::LabelKind;
use fishsense_db::repositories::{
    DiveFrameClusterRepo, DiveRepo, DiveSlateLabelRepo, HeadTailLabelRepo, ImageRepo,
    LaserExtrinsicsRepo, LaserLabelRepo, SpeciesLabelRepo,
};
use sqlx::PgConnection;

use super::{created, Created};
use crate::error::{AppError, AppResult};
use crate::extract::{DbSession, NormalizedJson};

// ---------------------------------------------------------------------------
// Dives
// ---------------------------------------------------------------------------

/// GET /api/v1/dives/
pub async fn list_dives(mut db: DbSession) -> AppResult<Json<Vec<Dive>>> {
    Ok(Json(DiveRepo::list(&mut db).await?))
}

/// GET /api/v1/dives/{id}
pub async fn get_dive(mut db: DbSession, Path(id): Path<DbId>) -> AppResult<Json<Dive>> {
    DiveRepo::find_by_id(&mut db, id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("Dive", id))
}

/// PUT /api/v1/dives/{id}
pub async fn put_dive(
    mut db: DbSession,
    Path(id): Path<DbId>,
    NormalizedJson(input): NormalizedJson<SaveDive>,
) -> AppResult<Created> {
    let id = DiveRepo::upsert(&mut db, id, &input).await?;
    Ok(created(id))
}

/// GET /api/v1/dives/{id}/images/
pub async fn list_dive_images(
    mut db: DbSession,
    Path(dive_id): Path<DbId>,
) -> AppResult<Json<Vec<Image>>> {
    Ok(Json(ImageRepo::list_by_dive(&mut db, dive_id).await?))
}

// ---------------------------------------------------------------------------
// Laser extrinsics
// ---------------------------------------------------------------------------

/// GET /api/v1/dives/{id}/laser-extrinsics
pub async fn get_laser_extrinsics(
    mut db: DbSession,
    Path(dive_id): Path<DbId>,
) -> AppResult<Json<LaserExtrinsics>> {
    LaserExtrinsicsRepo::find_current_for_dive(&mut db, dive_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("Laser extrinsics", dive_id))
}

/// POST /api/v1/dives/{id}/laser-extrinsics
pub async fn create_laser_extrinsics(
    mut db: DbSession,
    Path(dive_id): Path<DbId>,
    NormalizedJson(input): NormalizedJson<CreateLaserExtrinsics>,
) -> AppResult<Created> {
    let id = LaserExtrinsicsRepo::create(&mut db, dive_id, &input).await?;
    tracing::info!(dive_id, extrinsics_id = id, "Laser extrinsics recorded");
    Ok(created(id))
}

// ---------------------------------------------------------------------------
// Frame clusters
// ---------------------------------------------------------------------------

/// GET /api/v1/dives/{id}/images/clusters/
pub async fn list_clusters(
    mut db: DbSession,
    Path(dive_id): Path<DbId>,
) -> AppResult<Json<Vec<DiveFrameClusterJson>>> {
    Ok(Json(
        DiveFrameClusterRepo::list_by_dive(&mut db, dive_id, None).await?,
    ))
}

/// GET /api/v1/dives/{id}/images/clusters/{data_source}
pub async fn list_clusters_by_source(
    mut db: DbSession,
    Path((dive_id, data_source)): Path<(DbId, String)>,
) -> AppResult<Json<Vec<DiveFrameClusterJson>>> {
    let data_source: DataSource = data_source.parse().map_err(|message| AppError::Unprocessable {
        field: "data_source".into(),
        message,
    })?;
    Ok(Json(
        DiveFrameClusterRepo::list_by_dive(&mut db, dive_id, Some(data_source)).await?,
    ))
}

/// POST /api/v1/dives/{id}/images/clusters/
pub async fn create_cluster(
    mut db: DbSession,
    Path(dive_id): Path<DbId>,
    NormalizedJson(input): NormalizedJson<SaveDiveFrameCluster>,
) -> AppResult<Created> {
    ensure_images_exist(&mut db, &input).await?;
    let id = DiveFrameClusterRepo::create(&mut db, dive_id, &input).await?;
    Ok(created(id))
}

/// PUT /api/v1/dives/{id}/images/clusters/{cluster_id}
///
/// Replaces the cluster's membership with `image_ids`. A cluster id already
/// used by another dive is a conflict.
pub async fn put_cluster(
    mut db: DbSession,
    Path((dive_id, cluster_id)): Path<(DbId, String)>,
    NormalizedJson(input): NormalizedJson<SaveDiveFrameCluster>,
) -> AppResult<Created> {
    let cluster_id: DbId = cluster_id.parse().map_err(|_| AppError::Unprocessable {
        field: "cluster_id".into(),
        message: format!("`{cluster_id}` is not an integer id"),
    })?;
    if let Some(existing) = DiveFrameClusterRepo::find_by_id(&mut db, cluster_id).await? {
        if existing.dive_id != Some(dive_id) {
            return Err(CoreError::Conflict(format!(
                "Cluster {cluster_id} belongs to another dive"
            ))
            .into());
        }
    }
    ensure_images_exist(&mut db, &input).await?;
    let id = DiveFrameClusterRepo::upsert(&mut db, dive_id, cluster_id, &input).await?;
    Ok(created(id))
}

/// Reject cluster bodies naming images that do not exist.
async fn ensure_images_exist(
    conn: &mut PgConnection,
    input: &SaveDiveFrameCluster,
) -> AppResult<()> {
    let missing = ImageRepo::missing_ids(conn, &input.image_ids).await?;
    if missing.is_empty() {
        return Ok(());
    }
    let ids: Vec<String> = missing.iter().map(ToString::to_string).collect();
    Err(AppError::Unprocessable {
        field: "image_ids".into(),
        message: format!("Unknown image ids: {}", ids.join(", ")),
    })
}

// ---------------------------------------------------------------------------
// Labels
// ---------------------------------------------------------------------------

/// GET /api/v1/dives/{id}/labels/{kind}
///
/// Labels of every image in the dive, superseded ones excluded. An empty
/// dive yields `[]`.
pub async fn list_dive_labels(
    mut db: DbSession,
    Path((dive_id, kind)): Path<(DbId, LabelKind)>,
) -> AppResult<Response> {
    let response = match kind {
        LabelKind::Laser => {
            Json(LaserLabelRepo::list_by_dive(&mut db, dive_id).await?).into_response()
        }
        LabelKind::HeadTail => {
            Json(HeadTailLabelRepo::list_by_dive(&mut db, dive_id).await?).into_response()
        }
        LabelKind::Species => {
            Json(SpeciesLabelRepo::list_by_dive(&mut db, dive_id).await?).into_response()
        }
        LabelKind::DiveSlate => {
            Json(DiveSlateLabelRepo::list_by_dive(&mut db, dive_id).await?).into_response()
        }
    };
    Ok(response)
}
