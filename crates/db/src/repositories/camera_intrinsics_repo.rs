//! Repository for the `camera_intrinsics` table.

use fishsense_core::types::DbId;
use sqlx::types::Json;
use sqlx::{Connection, PgConnection};

use super::sync_id_sequence;
use crate::models::camera::{CameraIntrinsics, SaveCameraIntrinsics};

const COLUMNS: &str = "id, camera_matrix, distortion_coefficients, camera_id";

pub struct CameraIntrinsicsRepo;

impl CameraIntrinsicsRepo {
    /// The camera's current calibration: the most recently inserted row.
    pub async fn find_current(
        conn: &mut PgConnection,
        camera_id: DbId,
    ) -> Result<Option<CameraIntrinsics>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM camera_intrinsics
             WHERE camera_id = $1
             ORDER BY id DESC
             LIMIT 1"
        );
        sqlx::query_as::<_, CameraIntrinsics>(&query)
            .bind(camera_id)
            .fetch_optional(conn)
            .await
    }

    /// Insert a new calibration, or replace the one named by `input.id`.
    pub async fn save(
        conn: &mut PgConnection,
        camera_id: DbId,
        input: &SaveCameraIntrinsics,
    ) -> Result<DbId, sqlx::Error> {
        let Some(id) = input.id else {
            return sqlx::query_scalar::<_, DbId>(
                "INSERT INTO camera_intrinsics (camera_matrix, distortion_coefficients, camera_id)
                 VALUES ($1, $2, $3)
                 RETURNING id",
            )
            .bind(Json(&input.camera_matrix))
            .bind(Json(&input.distortion_coefficients))
            .bind(camera_id)
            .fetch_one(conn)
            .await;
        };

        let mut tx = conn.begin().await?;
        let id = sqlx::query_scalar::<_, DbId>(
            "INSERT INTO camera_intrinsics (id, camera_matrix, distortion_coefficients, camera_id)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (id) DO UPDATE SET
                camera_matrix = EXCLUDED.camera_matrix,
                distortion_coefficients = EXCLUDED.distortion_coefficients,
                camera_id = EXCLUDED.camera_id
             RETURNING id",
        )
        .bind(id)
        .bind(Json(&input.camera_matrix))
        .bind(Json(&input.distortion_coefficients))
        .bind(camera_id)
        .fetch_one(&mut *tx)
        .await?;
        sync_id_sequence(&mut *tx, "camera_intrinsics").await?;
        tx.commit().await?;
        Ok(id)
    }
}
