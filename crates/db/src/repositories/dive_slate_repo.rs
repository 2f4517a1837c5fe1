//! Repository for the `dive_slates` table.

use fishsense_core::types::DbId;
use sqlx::types::Json;
use sqlx::{Connection, PgConnection};

use super::sync_id_sequence;
use crate::models::dive_slate::{DiveSlate, SaveDiveSlate};

const COLUMNS: &str = "id, name, dpi, path, created_at, reference_points";

/// Provides CRUD operations for dive slates.
pub struct DiveSlateRepo;

impl DiveSlateRepo {
    pub async fn list(conn: &mut PgConnection) -> Result<Vec<DiveSlate>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM dive_slates ORDER BY id");
        sqlx::query_as::<_, DiveSlate>(&query).fetch_all(conn).await
    }

    pub async fn find_by_id(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<DiveSlate>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM dive_slates WHERE id = $1");
        sqlx::query_as::<_, DiveSlate>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Create or replace the slate with this ID.
    ///
    /// An omitted `created_at` defaults to now on insert and keeps the stored
    /// value on replace.
    pub async fn upsert(
        conn: &mut PgConnection,
        id: DbId,
        input: &SaveDiveSlate,
    ) -> Result<DbId, sqlx::Error> {
        let mut tx = conn.begin().await?;
        let id = sqlx::query_scalar::<_, DbId>(
            "INSERT INTO dive_slates (id, name, dpi, path, created_at, reference_points)
             VALUES ($1, $2, $3, $4, COALESCE($5, NOW()), $6)
             ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                dpi = EXCLUDED.dpi,
                path = EXCLUDED.path,
                created_at = COALESCE($5, dive_slates.created_at),
                reference_points = EXCLUDED.reference_points
             RETURNING id",
        )
        .bind(id)
        .bind(&input.name)
        .bind(input.dpi)
        .bind(&input.path)
        .bind(input.created_at)
        .bind(input.reference_points.as_ref().map(Json))
        .fetch_one(&mut *tx)
        .await?;
        sync_id_sequence(&mut *tx, "dive_slates").await?;
        tx.commit().await?;
        Ok(id)
    }
}
