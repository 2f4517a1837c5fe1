//! Persistence layer: pooled sessions, schema bootstrap, models and
//! repositories for the FishSense metadata store.

use sqlx::postgres::PgConnectOptions;

pub mod models;
pub mod repositories;
pub mod session;

pub use session::{AdmissionGate, PoolSettings, Session, SessionError, SessionManager};

pub type DbPool = sqlx::PgPool;

/// Full schema, every statement guarded with `IF NOT EXISTS`.
const SCHEMA_SQL: &str = include_str!("../schema/schema.sql");

/// Create a connection pool sized and tuned by `settings`.
///
/// Connects eagerly so an unreachable database fails at startup.
pub async fn create_pool(
    options: PgConnectOptions,
    settings: &PoolSettings,
) -> Result<DbPool, sqlx::Error> {
    settings.pool_options().connect_with(options).await
}

/// Verify that the database answers a trivial query.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Create every table, type and index that does not exist yet.
///
/// This is not a migration engine: existing objects are never altered.
pub async fn ensure_schema(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::raw_sql(SCHEMA_SQL).execute(pool).await?;
    tracing::info!("Database schema ensured");
    Ok(())
}
