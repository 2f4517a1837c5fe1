//! Repository for the `dives` table.

use fishsense_core::types::DbId;
use sqlx::{Connection, PgConnection};

use super::sync_id_sequence;
use crate::models::dive::{Dive, SaveDive};

/// Column list for dives queries.
const COLUMNS: &str =
    "id, name, path, dive_datetime, priority, flip_dive_slate, camera_id, dive_slate_id";

/// Provides CRUD operations for dives.
pub struct DiveRepo;

impl DiveRepo {
    /// List all dives, ordered by ID.
    pub async fn list(conn: &mut PgConnection) -> Result<Vec<Dive>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM dives ORDER BY id");
        sqlx::query_as::<_, Dive>(&query).fetch_all(conn).await
    }

    /// Find a dive by its ID.
    pub async fn find_by_id(conn: &mut PgConnection, id: DbId) -> Result<Option<Dive>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM dives WHERE id = $1");
        sqlx::query_as::<_, Dive>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Create or replace the dive with this ID.
    pub async fn upsert(
        conn: &mut PgConnection,
        id: DbId,
        input: &SaveDive,
    ) -> Result<DbId, sqlx::Error> {
        let mut tx = conn.begin().await?;
        let id = sqlx::query_scalar::<_, DbId>(
            "INSERT INTO dives
                (id, name, path, dive_datetime, priority, flip_dive_slate, camera_id, dive_slate_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                path = EXCLUDED.path,
                dive_datetime = EXCLUDED.dive_datetime,
                priority = EXCLUDED.priority,
                flip_dive_slate = EXCLUDED.flip_dive_slate,
                camera_id = EXCLUDED.camera_id,
                dive_slate_id = EXCLUDED.dive_slate_id
             RETURNING id",
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.path)
        .bind(input.dive_datetime)
        .bind(&input.priority)
        .bind(input.flip_dive_slate)
        .bind(input.camera_id)
        .bind(input.dive_slate_id)
        .fetch_one(&mut *tx)
        .await?;
        sync_id_sequence(&mut *tx, "dives").await?;
        tx.commit().await?;

        tracing::debug!(dive_id = id, "Dive saved");
        Ok(id)
    }
}
