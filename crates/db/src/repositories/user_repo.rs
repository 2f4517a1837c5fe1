//! Repository for the `users` table.

use fishsense_core::types::DbId;
use sqlx::{Connection, PgConnection};

use super::sync_id_sequence;
use crate::models::user::{SaveUser, User};

/// Column list for users queries.
const COLUMNS: &str =
    "id, label_studio_id, email, first_name, last_name, last_activity, date_joined";

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    /// List all users, ordered by ID.
    pub async fn list(conn: &mut PgConnection) -> Result<Vec<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users ORDER BY id");
        sqlx::query_as::<_, User>(&query).fetch_all(conn).await
    }

    /// Find a user by their ID.
    pub async fn find_by_id(conn: &mut PgConnection, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Find a user by email address.
    pub async fn find_by_email(
        conn: &mut PgConnection,
        email: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(conn)
            .await
    }

    /// Find a user by their Label Studio account id.
    pub async fn find_by_label_studio_id(
        conn: &mut PgConnection,
        label_studio_id: i64,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE label_studio_id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(label_studio_id)
            .fetch_optional(conn)
            .await
    }

    /// Insert a new user, returning the assigned ID.
    pub async fn create(conn: &mut PgConnection, input: &SaveUser) -> Result<DbId, sqlx::Error> {
        let id = sqlx::query_scalar::<_, DbId>(
            "INSERT INTO users
                (label_studio_id, email, first_name, last_name, last_activity, date_joined)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING id",
        )
        .bind(input.label_studio_id)
        .bind(&input.email)
        .bind(&input.first_name)
        .bind(&input.last_name)
        .bind(input.last_activity)
        .bind(input.date_joined)
        .fetch_one(conn)
        .await?;

        tracing::debug!(user_id = id, "User created");
        Ok(id)
    }

    /// Create or replace the user with this ID.
    pub async fn upsert(
        conn: &mut PgConnection,
        id: DbId,
        input: &SaveUser,
    ) -> Result<DbId, sqlx::Error> {
        let mut tx = conn.begin().await?;
        let id = sqlx::query_scalar::<_, DbId>(
            "INSERT INTO users
                (id, label_studio_id, email, first_name, last_name, last_activity, date_joined)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             ON CONFLICT (id) DO UPDATE SET
                label_studio_id = EXCLUDED.label_studio_id,
                email = EXCLUDED.email,
                first_name = EXCLUDED.first_name,
                last_name = EXCLUDED.last_name,
                last_activity = EXCLUDED.last_activity,
                date_joined = EXCLUDED.date_joined
             RETURNING id",
        )
        .bind(id)
        .bind(input.label_studio_id)
        .bind(&input.email)
        .bind(&input.first_name)
        .bind(&input.last_name)
        .bind(input.last_activity)
        .bind(input.date_joined)
        .fetch_one(&mut *tx)
        .await?;
        sync_id_sequence(&mut *tx, "users").await?;
        tx.commit().await?;

        tracing::debug!(user_id = id, "User saved");
        Ok(id)
    }
}
