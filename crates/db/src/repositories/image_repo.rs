//! Repository for the `images` table.

use fishsense_core::types::DbId;
use sqlx::{Connection, PgConnection};

use super::sync_id_sequence;
use crate::models::image::{Image, SaveImage};

/// Column list for images queries.
const COLUMNS: &str = "id, path, taken_datetime, checksum, is_canonical, dive_id, camera_id";

/// Provides CRUD operations for images.
pub struct ImageRepo;

impl ImageRepo {
    /// Find an image by its ID.
    pub async fn find_by_id(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<Image>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM images WHERE id = $1");
        sqlx::query_as::<_, Image>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Find an image by its content checksum.
    pub async fn find_by_checksum(
        conn: &mut PgConnection,
        checksum: &str,
    ) -> Result<Option<Image>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM images WHERE checksum = $1");
        sqlx::query_as::<_, Image>(&query)
            .bind(checksum)
            .fetch_optional(conn)
            .await
    }

    /// List the images of a dive, ordered by ID.
    pub async fn list_by_dive(
        conn: &mut PgConnection,
        dive_id: DbId,
    ) -> Result<Vec<Image>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM images WHERE dive_id = $1 ORDER BY id");
        sqlx::query_as::<_, Image>(&query)
            .bind(dive_id)
            .fetch_all(conn)
            .await
    }

    /// Return those of `ids` that name no image, ascending.
    pub async fn missing_ids(
        conn: &mut PgConnection,
        ids: &[DbId],
    ) -> Result<Vec<DbId>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_scalar::<_, DbId>(
            "SELECT DISTINCT wanted.id
             FROM UNNEST($1::bigint[]) AS wanted(id)
             WHERE NOT EXISTS (SELECT 1 FROM images i WHERE i.id = wanted.id)
             ORDER BY wanted.id",
        )
        .bind(ids)
        .fetch_all(conn)
        .await
    }

    /// Create or replace the image with this ID.
    pub async fn upsert(
        conn: &mut PgConnection,
        id: DbId,
        input: &SaveImage,
    ) -> Result<DbId, sqlx::Error> {
        let mut tx = conn.begin().await?;
        let id = sqlx::query_scalar::<_, DbId>(
            "INSERT INTO images
                (id, path, taken_datetime, checksum, is_canonical, dive_id, camera_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             ON CONFLICT (id) DO UPDATE SET
                path = EXCLUDED.path,
                taken_datetime = EXCLUDED.taken_datetime,
                checksum = EXCLUDED.checksum,
                is_canonical = EXCLUDED.is_canonical,
                dive_id = EXCLUDED.dive_id,
                camera_id = EXCLUDED.camera_id
             RETURNING id",
        )
        .bind(id)
        .bind(&input.path)
        .bind(input.taken_datetime)
        .bind(&input.checksum)
        .bind(input.is_canonical)
        .bind(input.dive_id)
        .bind(input.camera_id)
        .fetch_one(&mut *tx)
        .await?;
        sync_id_sequence(&mut *tx, "images").await?;
        tx.commit().await?;
        Ok(id)
    }
}
