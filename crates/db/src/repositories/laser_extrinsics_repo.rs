//! Repository for the `laser_extrinsics` table.

use fishsense_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgConnection;

use crate::models::dive::{CreateLaserExtrinsics, LaserExtrinsics};

const COLUMNS: &str = "id, laser_position, laser_axis, created_at, dive_id, camera_id";

pub struct LaserExtrinsicsRepo;

impl LaserExtrinsicsRepo {
    /// The dive's current calibration: latest `created_at`, ties broken by
    /// the highest ID.
    pub async fn find_current_for_dive(
        conn: &mut PgConnection,
        dive_id: DbId,
    ) -> Result<Option<LaserExtrinsics>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM laser_extrinsics
             WHERE dive_id = $1
             ORDER BY created_at DESC, id DESC
             LIMIT 1"
        );
        sqlx::query_as::<_, LaserExtrinsics>(&query)
            .bind(dive_id)
            .fetch_optional(conn)
            .await
    }

    /// Record a new calibration. Earlier ones are kept as history.
    pub async fn create(
        conn: &mut PgConnection,
        dive_id: DbId,
        input: &CreateLaserExtrinsics,
    ) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "INSERT INTO laser_extrinsics (laser_position, laser_axis, created_at, dive_id, camera_id)
             VALUES ($1, $2, COALESCE($3, NOW()), $4, $5)
             RETURNING id",
        )
        .bind(Json(&input.laser_position))
        .bind(Json(&input.laser_axis))
        .bind(input.created_at)
        .bind(dive_id)
        .bind(input.camera_id)
        .fetch_one(conn)
        .await
    }
}
