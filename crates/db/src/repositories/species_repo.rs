//! Repository for the `species` table.

use fishsense_core::types::DbId;
use sqlx::{Connection, PgConnection};

use super::sync_id_sequence;
use crate::models::fish::{SaveSpecies, Species};

const COLUMNS: &str = "id, scientific_name, common_name";

pub struct SpeciesRepo;

impl SpeciesRepo {
    pub async fn list(conn: &mut PgConnection) -> Result<Vec<Species>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM species ORDER BY id");
        sqlx::query_as::<_, Species>(&query).fetch_all(conn).await
    }

    /// Scientific names are not unique; the oldest matching row wins.
    pub async fn find_by_scientific_name(
        conn: &mut PgConnection,
        scientific_name: &str,
    ) -> Result<Option<Species>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM species WHERE scientific_name = $1 ORDER BY id LIMIT 1"
        );
        sqlx::query_as::<_, Species>(&query)
            .bind(scientific_name)
            .fetch_optional(conn)
            .await
    }

    /// Insert a species, or merge onto `input.id` when given.
    pub async fn save(conn: &mut PgConnection, input: &SaveSpecies) -> Result<DbId, sqlx::Error> {
        let Some(id) = input.id else {
            return sqlx::query_scalar::<_, DbId>(
                "INSERT INTO species (scientific_name, common_name) VALUES ($1, $2) RETURNING id",
            )
            .bind(&input.scientific_name)
            .bind(&input.common_name)
            .fetch_one(conn)
            .await;
        };

        let mut tx = conn.begin().await?;
        let id = sqlx::query_scalar::<_, DbId>(
            "INSERT INTO species (id, scientific_name, common_name)
             VALUES ($1, $2, $3)
             ON CONFLICT (id) DO UPDATE SET
                scientific_name = EXCLUDED.scientific_name,
                common_name = EXCLUDED.common_name
             RETURNING id",
        )
        .bind(id)
        .bind(&input.scientific_name)
        .bind(&input.common_name)
        .fetch_one(&mut *tx)
        .await?;
        sync_id_sequence(&mut *tx, "species").await?;
        tx.commit().await?;
        Ok(id)
    }
}
