//! Repository for the `cameras` table.

use fishsense_core::types::DbId;
use sqlx::{Connection, PgConnection};

use super::sync_id_sequence;
use crate::models::camera::{Camera, SaveCamera};

/// Column list for cameras queries.
const COLUMNS: &str = "id, serial_number, name";

/// Provides CRUD operations for cameras.
pub struct CameraRepo;

impl CameraRepo {
    /// List all cameras, ordered by ID.
    pub async fn list(conn: &mut PgConnection) -> Result<Vec<Camera>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM cameras ORDER BY id");
        sqlx::query_as::<_, Camera>(&query).fetch_all(conn).await
    }

    /// Find a camera by its ID.
    pub async fn find_by_id(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<Camera>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM cameras WHERE id = $1");
        sqlx::query_as::<_, Camera>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Create the camera with this ID, or replace its fields if it exists.
    pub async fn upsert(
        conn: &mut PgConnection,
        id: DbId,
        input: &SaveCamera,
    ) -> Result<DbId, sqlx::Error> {
        let mut tx = conn.begin().await?;
        let id = sqlx::query_scalar::<_, DbId>(
            "INSERT INTO cameras (id, serial_number, name)
             VALUES ($1, $2, $3)
             ON CONFLICT (id) DO UPDATE SET
                serial_number = EXCLUDED.serial_number,
                name = EXCLUDED.name
             RETURNING id",
        )
        .bind(id)
        .bind(&input.serial_number)
        .bind(&input.name)
        .fetch_one(&mut *tx)
        .await?;
        sync_id_sequence(&mut *tx, "cameras").await?;
        tx.commit().await?;

        tracing::debug!(camera_id = id, "Camera saved");
        Ok(id)
    }
}
