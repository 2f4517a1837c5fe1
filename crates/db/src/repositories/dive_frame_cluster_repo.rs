//! Repository for `dive_frame_clusters` and their image mappings.
//!
//! Membership lives in `dive_frame_cluster_images`. It is only ever written
//! as a whole set, inside the same transaction as the cluster row.

use fishsense_core::types::DbId;
use sqlx::{Connection, PgConnection};

use super::sync_id_sequence;
use crate::models::data_source::DataSource;
use crate::models::dive_frame_cluster::{DiveFrameClusterJson, SaveDiveFrameCluster};

/// Cluster rows joined with their ascending member ids.
const JSON_SELECT: &str = "SELECT c.id,
        COALESCE(
            ARRAY_AGG(m.image_id ORDER BY m.image_id) FILTER (WHERE m.image_id IS NOT NULL),
            '{}'
        ) AS image_ids,
        c.data_source, c.updated_at, c.dive_id, c.fish_id
     FROM dive_frame_clusters c
     LEFT JOIN dive_frame_cluster_images m ON m.dive_frame_cluster_id = c.id";

pub struct DiveFrameClusterRepo;

impl DiveFrameClusterRepo {
    /// List a dive's clusters, optionally restricted to one provenance.
    pub async fn list_by_dive(
        conn: &mut PgConnection,
        dive_id: DbId,
        data_source: Option<DataSource>,
    ) -> Result<Vec<DiveFrameClusterJson>, sqlx::Error> {
        let query = format!(
            "{JSON_SELECT}
             WHERE c.dive_id = $1 AND ($2::data_source IS NULL OR c.data_source = $2)
             GROUP BY c.id
             ORDER BY c.id"
        );
        sqlx::query_as::<_, DiveFrameClusterJson>(&query)
            .bind(dive_id)
            .bind(data_source)
            .fetch_all(conn)
            .await
    }

    pub async fn find_by_id(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<DiveFrameClusterJson>, sqlx::Error> {
        let query = format!("{JSON_SELECT} WHERE c.id = $1 GROUP BY c.id");
        sqlx::query_as::<_, DiveFrameClusterJson>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Insert a cluster and its mappings in one transaction.
    ///
    /// Callers check that every member image exists first.
    pub async fn create(
        conn: &mut PgConnection,
        dive_id: DbId,
        input: &SaveDiveFrameCluster,
    ) -> Result<DbId, sqlx::Error> {
        let mut tx = conn.begin().await?;
        let id = sqlx::query_scalar::<_, DbId>(
            "INSERT INTO dive_frame_clusters (data_source, updated_at, dive_id, fish_id)
             VALUES ($1, $2, $3, $4)
             RETURNING id",
        )
        .bind(input.data_source)
        .bind(input.updated_at)
        .bind(dive_id)
        .bind(input.fish_id)
        .fetch_one(&mut *tx)
        .await?;
        insert_mappings(&mut *tx, id, &input.unique_image_ids()).await?;
        tx.commit().await?;

        tracing::debug!(cluster_id = id, dive_id, "Cluster created");
        Ok(id)
    }

    /// Create or replace the cluster with this ID, replacing its mappings.
    pub async fn upsert(
        conn: &mut PgConnection,
        dive_id: DbId,
        id: DbId,
        input: &SaveDiveFrameCluster,
    ) -> Result<DbId, sqlx::Error> {
        let mut tx = conn.begin().await?;
        let id = sqlx::query_scalar::<_, DbId>(
            "INSERT INTO dive_frame_clusters (id, data_source, updated_at, dive_id, fish_id)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT (id) DO UPDATE SET
                data_source = EXCLUDED.data_source,
                updated_at = EXCLUDED.updated_at,
                dive_id = EXCLUDED.dive_id,
                fish_id = EXCLUDED.fish_id
             RETURNING id",
        )
        .bind(id)
        .bind(input.data_source)
        .bind(input.updated_at)
        .bind(dive_id)
        .bind(input.fish_id)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM dive_frame_cluster_images WHERE dive_frame_cluster_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        insert_mappings(&mut *tx, id, &input.unique_image_ids()).await?;
        sync_id_sequence(&mut *tx, "dive_frame_clusters").await?;
        tx.commit().await?;

        tracing::debug!(cluster_id = id, dive_id, "Cluster replaced");
        Ok(id)
    }
}

async fn insert_mappings(
    conn: &mut PgConnection,
    cluster_id: DbId,
    image_ids: &[DbId],
) -> Result<(), sqlx::Error> {
    if image_ids.is_empty() {
        return Ok(());
    }
    sqlx::query(
        "INSERT INTO dive_frame_cluster_images (dive_frame_cluster_id, image_id)
         SELECT $1, UNNEST($2::bigint[])",
    )
    .bind(cluster_id)
    .bind(image_ids)
    .execute(conn)
    .await?;
    Ok(())
}
