//! Repository for the `fish` table.

use fishsense_core::types::DbId;
use sqlx::{Connection, PgConnection};

use super::sync_id_sequence;
use crate::models::fish::{Fish, SaveFish};

const COLUMNS: &str = "id, species_id";

/// Provides CRUD operations for individual fish.
pub struct FishRepo;

impl FishRepo {
    pub async fn list(conn: &mut PgConnection) -> Result<Vec<Fish>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM fish ORDER BY id");
        sqlx::query_as::<_, Fish>(&query).fetch_all(conn).await
    }

    pub async fn find_by_id(conn: &mut PgConnection, id: DbId) -> Result<Option<Fish>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM fish WHERE id = $1");
        sqlx::query_as::<_, Fish>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Insert a fish, or merge onto `input.id` when given.
    pub async fn save(conn: &mut PgConnection, input: &SaveFish) -> Result<DbId, sqlx::Error> {
        let Some(id) = input.id else {
            return sqlx::query_scalar::<_, DbId>(
                "INSERT INTO fish (species_id) VALUES ($1) RETURNING id",
            )
            .bind(input.species_id)
            .fetch_one(conn)
            .await;
        };

        let mut tx = conn.begin().await?;
        let id = sqlx::query_scalar::<_, DbId>(
            "INSERT INTO fish (id, species_id)
             VALUES ($1, $2)
             ON CONFLICT (id) DO UPDATE SET species_id = EXCLUDED.species_id
             RETURNING id",
        )
        .bind(id)
        .bind(input.species_id)
        .fetch_one(&mut *tx)
        .await?;
        sync_id_sequence(&mut *tx, "fish").await?;
        tx.commit().await?;
        Ok(id)
    }
}
