//! Repository for the `head_tail_labels` table.

use fishsense_core::types::DbId;
use sqlx::{Connection, PgConnection};

use super::sync_id_sequence;
use crate::models::label::{HeadTailLabel, SaveHeadTailLabel};

const COLUMNS: &str = "id, label_studio_task_id, label_studio_project_id, \
    head_x, head_y, tail_x, tail_y, \
    updated_at, superseded, completed, label_studio_json, image_id, user_id";

pub struct HeadTailLabelRepo;

impl HeadTailLabelRepo {
    /// The authoritative label of an image: not superseded, newest first.
    pub async fn find_current_by_image(
        conn: &mut PgConnection,
        image_id: DbId,
    ) -> Result<Option<HeadTailLabel>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM head_tail_labels
             WHERE image_id = $1 AND NOT superseded
             ORDER BY updated_at DESC NULLS LAST, id DESC
             LIMIT 1"
        );
        sqlx::query_as::<_, HeadTailLabel>(&query)
            .bind(image_id)
            .fetch_optional(conn)
            .await
    }

    pub async fn find_by_task_id(
        conn: &mut PgConnection,
        task_id: i64,
    ) -> Result<Option<HeadTailLabel>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM head_tail_labels WHERE label_studio_task_id = $1");
        sqlx::query_as::<_, HeadTailLabel>(&query)
            .bind(task_id)
            .fetch_optional(conn)
            .await
    }

    pub async fn list_by_dive(
        conn: &mut PgConnection,
        dive_id: DbId,
    ) -> Result<Vec<HeadTailLabel>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM head_tail_labels
             WHERE image_id IN (SELECT id FROM images WHERE dive_id = $1)
               AND NOT superseded
             ORDER BY image_id, id"
        );
        sqlx::query_as::<_, HeadTailLabel>(&query)
            .bind(dive_id)
            .fetch_all(conn)
            .await
    }

    pub async fn save(
        conn: &mut PgConnection,
        image_id: DbId,
        input: &SaveHeadTailLabel,
    ) -> Result<DbId, sqlx::Error> {
        let mut tx = conn.begin().await?;
        let id = sqlx::query_scalar::<_, DbId>(
            "INSERT INTO head_tail_labels
                (id, label_studio_task_id, label_studio_project_id, head_x, head_y, tail_x, tail_y,
                 updated_at, superseded, completed, label_studio_json, image_id, user_id)
             VALUES (COALESCE($1, nextval(pg_get_serial_sequence('head_tail_labels', 'id'))),
                     $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
             ON CONFLICT (id) DO UPDATE SET
                label_studio_task_id = EXCLUDED.label_studio_task_id,
                label_studio_project_id = EXCLUDED.label_studio_project_id,
                head_x = EXCLUDED.head_x,
                head_y = EXCLUDED.head_y,
                tail_x = EXCLUDED.tail_x,
                tail_y = EXCLUDED.tail_y,
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
        .bind(input.head_x)
        .bind(input.head_y)
        .bind(input.tail_x)
        .bind(input.tail_y)
        .bind(input.updated_at)
        .bind(input.superseded)
        .bind(input.completed)
        .bind(&input.label_studio_json)
        .bind(image_id)
        .bind(input.user_id)
        .fetch_one(&mut *tx)
        .await?;
        if input.id.is_some() {
            sync_id_sequence(&mut *tx, "head_tail_labels").await?;
        }
        tx.commit().await?;

        tracing::debug!(label_id = id, image_id, "Head/tail label saved");
        Ok(id)
    }
}
