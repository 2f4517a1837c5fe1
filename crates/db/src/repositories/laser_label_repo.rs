//! Repository for the `laser_labels` table.

use fishsense_core::types::DbId;
use sqlx::{Connection, PgConnection};

use super::sync_id_sequence;
use crate::models::label::{LaserLabel, SaveLaserLabel};

/// Column list for laser_labels queries.
const COLUMNS: &str = "id, label_studio_task_id, label_studio_project_id, x, y, label, \
    updated_at, superseded, completed, label_studio_json, image_id, user_id";

/// Provides lookups and upserts for laser labels.
pub struct LaserLabelRepo;

impl LaserLabelRepo {
    /// The authoritative label of an image: not superseded, newest first.
    pub async fn find_current_by_image(
        conn: &mut PgConnection,
        image_id: DbId,
    ) -> Result<Option<LaserLabel>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM laser_labels
             WHERE image_id = $1 AND NOT superseded
             ORDER BY updated_at DESC NULLS LAST, id DESC
             LIMIT 1"
        );
        sqlx::query_as::<_, LaserLabel>(&query)
            .bind(image_id)
            .fetch_optional(conn)
            .await
    }

    /// Find a label by its Label Studio task id.
    pub async fn find_by_task_id(
        conn: &mut PgConnection,
        task_id: i64,
    ) -> Result<Option<LaserLabel>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM laser_labels WHERE label_studio_task_id = $1");
        sqlx::query_as::<_, LaserLabel>(&query)
            .bind(task_id)
            .fetch_optional(conn)
            .await
    }

    /// Non-superseded labels of every image in a dive.
    pub async fn list_by_dive(
        conn: &mut PgConnection,
        dive_id: DbId,
    ) -> Result<Vec<LaserLabel>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM laser_labels
             WHERE image_id IN (SELECT id FROM images WHERE dive_id = $1)
               AND NOT superseded
             ORDER BY image_id, id"
        );
        sqlx::query_as::<_, LaserLabel>(&query)
            .bind(dive_id)
            .fetch_all(conn)
            .await
    }

    /// Insert a label for `image_id`, or replace the one named by `input.id`.
    pub async fn save(
        conn: &mut PgConnection,
        image_id: DbId,
        input: &SaveLaserLabel,
    ) -> Result<DbId, sqlx::Error> {
        let mut tx = conn.begin().await?;
        let id = sqlx::query_scalar::<_, DbId>(
            "INSERT INTO laser_labels
                (id, label_studio_task_id, label_studio_project_id, x, y, label,
                 updated_at, superseded, completed, label_studio_json, image_id, user_id)
             VALUES (COALESCE($1, nextval(pg_get_serial_sequence('laser_labels', 'id'))),
                     $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
             ON CONFLICT (id) DO UPDATE SET
                label_studio_task_id = EXCLUDED.label_studio_task_id,
                label_studio_project_id = EXCLUDED.label_studio_project_id,
                x = EXCLUDED.x,
                y = EXCLUDED.y,
                label = EXCLUDED.label,
                updated_at = EXCLUDED.updated_at,
                superseded = EXCLUDED.superseded,
                completed = EXCLUDED.completed,
                label_studio_json = EXCLUDED.label_studio_json,
                image_id = EXCLUDED.image_id,
                user_id = EXCLUDED.user_id
             RETURNING id",
        )
        .bind(input.id)
        .bind(input.label_studio_task_id)
        .bind(input.label_studio_project_id)
        .bind(input.x)
        .bind(input.y)
        .bind(&input.label)
        .bind(input.updated_at)
        .bind(input.superseded)
        .bind(input.completed)
        .bind(&input.label_studio_json)
        .bind(image_id)
        .bind(input.user_id)
        .fetch_one(&mut *tx)
        .await?;
        if input.id.is_some() {
            sync_id_sequence(&mut *tx, "laser_labels").await?;
        }
        tx.commit().await?;

        tracing::debug!(label_id = id, image_id, "Laser label saved");
        Ok(id)
    }
}
