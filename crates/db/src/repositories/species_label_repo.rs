//! Repository for the `species_labels` table.
//!
//! Species labels have no superseded flag; the newest row of an image is
//! the authoritative one.

use fishsense_core::types::DbId;
use sqlx::{Connection, PgConnection};

use super::sync_id_sequence;
use crate::models::label::{SaveSpeciesLabel, SpeciesLabel};

const COLUMNS: &str = "id, label_studio_task_id, label_studio_project_id, image_url, \
    updated_at, completed, \"grouping\", top_three_photos_of_group, slate_upside_down, \
    laser_x, laser_y, laser_label, content_of_image, fish_measurable_category, \
    fish_angle_category, fish_curved_category, label_studio_json, image_id, user_id";

pub struct SpeciesLabelRepo;

impl SpeciesLabelRepo {
    pub async fn find_current_by_image(
        conn: &mut PgConnection,
        image_id: DbId,
    ) -> Result<Option<SpeciesLabel>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM species_labels
             WHERE image_id = $1
             ORDER BY updated_at DESC NULLS LAST, id DESC
             LIMIT 1"
        );
        sqlx::query_as::<_, SpeciesLabel>(&query)
            .bind(image_id)
            .fetch_optional(conn)
            .await
    }

    pub async fn find_by_task_id(
        conn: &mut PgConnection,
        task_id: i64,
    ) -> Result<Option<SpeciesLabel>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM species_labels WHERE label_studio_task_id = $1");
        sqlx::query_as::<_, SpeciesLabel>(&query)
            .bind(task_id)
            .fetch_optional(conn)
            .await
    }

    pub async fn list_by_dive(
        conn: &mut PgConnection,
        dive_id: DbId,
    ) -> Result<Vec<SpeciesLabel>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM species_labels
             WHERE image_id IN (SELECT id FROM images WHERE dive_id = $1)
             ORDER BY image_id, id"
        );
        sqlx::query_as::<_, SpeciesLabel>(&query)
            .bind(dive_id)
            .fetch_all(conn)
            .await
    }

    pub async fn save(
        conn: &mut PgConnection,
        image_id: DbId,
        input: &SaveSpeciesLabel,
    ) -> Result<DbId, sqlx::Error> {
        let mut tx = conn.begin().await?;
        let id = sqlx::query_scalar::<_, DbId>(
            "INSERT INTO species_labels
                (id, label_studio_task_id, label_studio_project_id, image_url, updated_at,
                 completed, \"grouping\", top_three_photos_of_group, slate_upside_down,
                 laser_x, laser_y, laser_label, content_of_image, fish_measurable_category,
                 fish_angle_category, fish_curved_category, label_studio_json, image_id, user_id)
             VALUES (COALESCE($1, nextval(pg_get_serial_sequence('species_labels', 'id'))),
                     $2, $3, $4, $5, $6, $7, $8, $9, $10,
                     $11, $12, $13, $14, $15, $16, $17, $18, $19)
             ON CONFLICT (id) DO UPDATE SET
                label_studio_task_id = EXCLUDED.label_studio_task_id,
                label_studio_project_id = EXCLUDED.label_studio_project_id,
                image_url = EXCLUDED.image_url,
                updated_at = EXCLUDED.updated_at,
                completed = EXCLUDED.completed,
                \"grouping\" = EXCLUDED.\"grouping\",
                top_three_photos_of_group = EXCLUDED.top_three_photos_of_group,
                slate_upside_down = EXCLUDED.slate_upside_down,
                laser_x = EXCLUDED.laser_x,
                laser_y = EXCLUDED.laser_y,
                laser_label = EXCLUDED.laser_label,
                content_of_image = EXCLUDED.content_of_image,
                fish_measurable_category = EXCLUDED.fish_measurable_category,
                fish_angle_category = EXCLUDED.fish_angle_category,
                fish_curved_category = EXCLUDED.fish_curved_category,
                label_studio_json = EXCLUDED.label_studio_json,
                image_id = EXCLUDED.image_id,
                user_id = EXCLUDED.user_id
             RETURNING id",
        )
        .bind(input.id)
        .bind(input.label_studio_task_id)
        .bind(input.label_studio_project_id)
        .bind(&input.image_url)
        .bind(input.updated_at)
        .bind(input.completed)
        .bind(&input.grouping)
        .bind(input.top_three_photos_of_group)
        .bind(input.slate_upside_down)
        .bind(input.laser_x)
        .bind(input.laser_y)
        .bind(&input.laser_label)
        .bind(&input.content_of_image)
        .bind(&input.fish_measurable_category)
        .bind(&input.fish_angle_category)
        .bind(&input.fish_curved_category)
        .bind(&input.label_studio_json)
        .bind(image_id)
        .bind(input.user_id)
        .fetch_one(&mut *tx)
        .await?;
        if input.id.is_some() {
            sync_id_sequence(&mut *tx, "species_labels").await?;
        }
        tx.commit().await?;

        tracing::debug!(label_id = id, image_id, "Species label saved");
        Ok(id)
    }
}
