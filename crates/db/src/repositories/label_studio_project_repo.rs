//! Repository for the `label_studio_projects` table.

use fishsense_core::types::DbId;
use sqlx::{Connection, PgConnection};

use super::sync_id_sequence;
use crate::models::label_studio_project::{LabelStudioProject, SaveLabelStudioProject};

const COLUMNS: &str = "id, label_studio_project_id, name, date_created";

pub struct LabelStudioProjectRepo;

impl LabelStudioProjectRepo {
    pub async fn list(conn: &mut PgConnection) -> Result<Vec<LabelStudioProject>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM label_studio_projects ORDER BY id");
        sqlx::query_as::<_, LabelStudioProject>(&query)
            .fetch_all(conn)
            .await
    }

    pub async fn find_by_id(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<LabelStudioProject>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM label_studio_projects WHERE id = $1");
        sqlx::query_as::<_, LabelStudioProject>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    pub async fn upsert(
        conn: &mut PgConnection,
        id: DbId,
        input: &SaveLabelStudioProject,
    ) -> Result<DbId, sqlx::Error> {
        let mut tx = conn.begin().await?;
        let id = sqlx::query_scalar::<_, DbId>(
            "INSERT INTO label_studio_projects (id, label_studio_project_id, name, date_created)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (id) DO UPDATE SET
                label_studio_project_id = EXCLUDED.label_studio_project_id,
                name = EXCLUDED.name,
                date_created = EXCLUDED.date_created
             RETURNING id",
        )
        .bind(id)
        .bind(input.label_studio_project_id)
        .bind(&input.name)
        .bind(input.date_created)
        .fetch_one(&mut *tx)
        .await?;
        sync_id_sequence(&mut *tx, "label_studio_projects").await?;
        tx.commit().await?;
        Ok(id)
    }
}
