//! Repository for the `measurements` table.

use fishsense_core::types::DbId;
use sqlx::{Connection, PgConnection};

use super::sync_id_sequence;
use crate::models::fish::{Measurement, SaveMeasurement};

const COLUMNS: &str = "id, length_m, image_id, fish_id";

pub struct MeasurementRepo;

impl MeasurementRepo {
    /// List a fish's measurements, ordered by ID.
    pub async fn list_by_fish(
        conn: &mut PgConnection,
        fish_id: DbId,
    ) -> Result<Vec<Measurement>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM measurements WHERE fish_id = $1 ORDER BY id");
        sqlx::query_as::<_, Measurement>(&query)
            .bind(fish_id)
            .fetch_all(conn)
            .await
    }

    /// Insert a measurement of `fish_id`, or merge onto `input.id` when given.
    pub async fn save(
        conn: &mut PgConnection,
        fish_id: DbId,
        input: &SaveMeasurement,
    ) -> Result<DbId, sqlx::Error> {
        let Some(id) = input.id else {
            return sqlx::query_scalar::<_, DbId>(
                "INSERT INTO measurements (length_m, image_id, fish_id)
                 VALUES ($1, $2, $3)
                 RETURNING id",
            )
            .bind(input.length_m)
            .bind(input.image_id)
            .bind(fish_id)
            .fetch_one(conn)
            .await;
        };

        let mut tx = conn.begin().await?;
        let id = sqlx::query_scalar::<_, DbId>(
            "INSERT INTO measurements (id, length_m, image_id, fish_id)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (id) DO UPDATE SET
                length_m = EXCLUDED.length_m,
                image_id = EXCLUDED.image_id,
                fish_id = EXCLUDED.fish_id
             RETURNING id",
        )
        .bind(id)
        .bind(input.length_m)
        .bind(input.image_id)
        .bind(fish_id)
        .fetch_one(&mut *tx)
        .await?;
        sync_id_sequence(&mut *tx, "measurements").await?;
        tx.commit().await?;
        Ok(id)
    }
}
