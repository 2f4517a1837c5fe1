//! Integration tests for the session manager against a real database.
//!
//! - The schema is created on the first acquisition
//! - Sessions are released on error paths
//! - The admission gate bounds concurrent sessions
//! - Gate and pool waits share one acquire deadline

use std::time::{Duration, Instant};

use assert_matches::assert_matches;
use fishsense_db::{PoolSettings, SessionError, SessionManager};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;

fn settings(admission_limit: usize) -> PoolSettings {
    PoolSettings {
        admission_limit,
        acquire_timeout_secs: 1,
        ..PoolSettings::default()
    }
}

#[sqlx::test(migrations = false)]
async fn test_first_acquire_creates_schema(pool: PgPool) {
    let manager = SessionManager::new(pool.clone(), &settings(4));
    let _session = manager.acquire().await.unwrap();

    for table in [
        "cameras",
        "dives",
        "images",
        "dive_frame_cluster_images",
        "laser_labels",
        "label_studio_projects",
    ] {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM information_schema.tables WHERE table_name = $1)",
        )
        .bind(table)
        .fetch_one(&pool)
        .await
        .unwrap();
        assert!(exists, "{table} should exist after bootstrap");
    }

    fishsense_db::health_check(&pool).await.unwrap();
}

#[sqlx::test(migrations = false)]
async fn test_schema_bootstrap_is_idempotent(pool: PgPool) {
    fishsense_db::ensure_schema(&pool).await.unwrap();
    fishsense_db::ensure_schema(&pool).await.unwrap();

    // A fresh manager re-runs the bootstrap against the existing schema.
    let manager = SessionManager::new(pool, &settings(4));
    assert!(manager.acquire().await.is_ok());
}

#[sqlx::test(migrations = false)]
async fn test_failed_statements_release_their_session(pool: PgPool) {
    let limit = 2;
    let manager = SessionManager::new(pool, &settings(limit));

    // More sequential failures than there are slots: a leak would deadlock.
    for _ in 0..=limit {
        let mut session = manager.acquire().await.unwrap();
        let result = sqlx::query("SELECT * FROM no_such_table")
            .execute(&mut *session)
            .await;
        assert!(result.is_err());
    }

    assert_eq!(manager.in_flight(), 0);
    assert!(manager.acquire().await.is_ok());
}

#[sqlx::test(migrations = false)]
async fn test_admission_limit_rejects_extra_sessions(pool: PgPool) {
    let manager = SessionManager::new(pool, &settings(2));

    let first = manager.acquire().await.unwrap();
    let _second = manager.acquire().await.unwrap();
    assert_eq!(manager.in_flight(), 2);

    let result = manager.acquire().await;
    assert_matches!(result, Err(SessionError::Exhausted { .. }));

    drop(first);
    assert_eq!(manager.in_flight(), 1);
    assert!(manager.acquire().await.is_ok());
}

#[sqlx::test(migrations = false)]
async fn test_concurrent_sessions_never_exceed_limit(pool: PgPool) {
    let manager = SessionManager::new(pool, &settings(3));
    // Warm the schema so every task does the same work.
    drop(manager.acquire().await.unwrap());

    let tasks = (0..10).map(|_| {
        let manager = manager.clone();
        async move {
            let mut session = manager.acquire().await.unwrap();
            let in_flight = manager.in_flight();
            sqlx::query("SELECT pg_sleep(0.02)")
                .execute(&mut *session)
                .await
                .unwrap();
            in_flight
        }
    });

    // Each task waits for a slot; the 1s acquire timeout is ample for 10 x 20ms.
    let observed = futures::future::join_all(tasks).await;
    assert!(observed.iter().all(|&n| n <= 3));
    assert_eq!(manager.in_flight(), 0);
}

#[sqlx::test(migrations = false)]
async fn test_closed_pool_reports_database_error(pool: PgPool) {
    let manager = SessionManager::new(pool, &settings(2));
    manager.close().await;

    let result = manager.acquire().await;
    assert_matches!(result, Err(SessionError::Database(sqlx::Error::PoolClosed)));
    assert_eq!(manager.in_flight(), 0);
}

#[sqlx::test(migrations = false)]
async fn test_pool_wait_shares_the_acquire_deadline(
    pool_opts: PgPoolOptions,
    connect_opts: PgConnectOptions,
) {
    // The pool's own timeout is far longer than the manager's 1s deadline.
    let pool = pool_opts
        .max_connections(1)
        .acquire_timeout(Duration::from_secs(30))
        .connect_with(connect_opts)
        .await
        .unwrap();
    let manager = SessionManager::new(pool, &settings(4));
    let _held = manager.acquire().await.unwrap();

    let started = Instant::now();
    let result = manager.acquire().await;
    assert_matches!(result, Err(SessionError::Exhausted { .. }));
    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(manager.in_flight(), 1);
}
