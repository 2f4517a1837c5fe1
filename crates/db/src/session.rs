//! Request-scoped database sessions.
//!
//! A [`SessionManager`] owns two process-wide resources:
//!
//! - the physical sqlx pool: `pool_size` base connections kept warm, up to
//!   `max_overflow` extra connections that are reaped when idle, and every
//!   connection recycled after `max_lifetime_secs`;
//! - an [`AdmissionGate`]: a semaphore capping the number of logical sessions
//!   in flight, independent of the physical pool size.
//!
//! [`SessionManager::acquire`] takes a gate permit first, then a pooled
//! connection, both within one deadline, and returns them inside a [`Session`]. Dropping the session
//! returns the connection and the permit, on every exit path of the caller
//! (normal return, `?`, panic unwind, or a cancelled future).

use std::ops::{Deref, DerefMut};
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use sqlx::pool::PoolConnection;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{PgConnection, PgPool, Postgres};
use tokio::sync::{OnceCell, OwnedSemaphorePermit, Semaphore};
use tokio::time::Instant;

use crate::ensure_schema;

/// Pool and admission tunables.
///
/// | Field                  | Default |
/// |------------------------|---------|
/// | `pool_size`            | `10`    |
/// | `max_overflow`         | `10`    |
/// | `max_lifetime_secs`    | `3600`  |
/// | `idle_timeout_secs`    | `300`   |
/// | `acquire_timeout_secs` | `30`    |
/// | `admission_limit`      | `20`    |
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PoolSettings {
    pub pool_size: u32,
    pub max_overflow: u32,
    pub max_lifetime_secs: u64,
    pub idle_timeout_secs: u64,
    pub acquire_timeout_secs: u64,
    pub admission_limit: usize,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            pool_size: 10,
            max_overflow: 10,
            max_lifetime_secs: 3600,
            idle_timeout_secs: 300,
            acquire_timeout_secs: 30,
            admission_limit: 20,
        }
    }
}

impl PoolSettings {
    /// Hard ceiling on physical connections: base plus overflow.
    pub fn max_connections(&self) -> u32 {
        self.pool_size.saturating_add(self.max_overflow)
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }

    /// sqlx pool options implementing the base/overflow/recycle policy.
    pub fn pool_options(&self) -> PgPoolOptions {
        PgPoolOptions::new()
            .min_connections(self.pool_size)
            .max_connections(self.max_connections())
            .idle_timeout(Duration::from_secs(self.idle_timeout_secs))
            .max_lifetime(Duration::from_secs(self.max_lifetime_secs))
            .acquire_timeout(self.acquire_timeout())
            .test_before_acquire(true)
    }
}

/// Errors raised while acquiring a [`Session`].
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Neither an admission permit nor a pooled connection became free in time.
    #[error("No database session available after waiting {waited:?}")]
    Exhausted { waited: Duration },

    /// The database could not be reached or the schema bootstrap failed.
    #[error("Database unavailable: {0}")]
    Database(#[from] sqlx::Error),
}

/// Concurrency limiter bounding simultaneously active sessions.
#[derive(Debug, Clone)]
pub struct AdmissionGate {
    semaphore: Arc<Semaphore>,
    limit: usize,
}

/// Proof of admission. Releases its slot on drop.
#[derive(Debug)]
pub struct AdmissionPermit {
    _permit: OwnedSemaphorePermit,
}

impl AdmissionGate {
    pub fn new(limit: usize) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(limit)),
            limit,
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Number of permits currently held.
    pub fn in_flight(&self) -> usize {
        self.limit - self.semaphore.available_permits()
    }

    /// Wait up to `timeout` for a free slot.
    pub async fn enter(&self, timeout: Duration) -> Result<AdmissionPermit, SessionError> {
        let acquire = Arc::clone(&self.semaphore).acquire_owned();
        match tokio::time::timeout(timeout, acquire).await {
            Ok(Ok(permit)) => Ok(AdmissionPermit { _permit: permit }),
            // The semaphore is never closed while the gate is alive.
            Ok(Err(_closed)) => Err(SessionError::Exhausted { waited: timeout }),
            Err(_elapsed) => {
                tracing::warn!(
                    limit = self.limit,
                    waited_ms = timeout.as_millis() as u64,
                    "Admission gate saturated"
                );
                Err(SessionError::Exhausted { waited: timeout })
            }
        }
    }
}

/// Hands out [`Session`]s. Cheap to clone; clones share the pool and gate.
#[derive(Debug, Clone)]
pub struct SessionManager {
    pool: PgPool,
    gate: AdmissionGate,
    acquire_timeout: Duration,
    schema_ready: Arc<OnceCell<()>>,
}

impl SessionManager {
    /// Wrap an existing pool (tests hand in their own isolated pool).
    pub fn new(pool: PgPool, settings: &PoolSettings) -> Self {
        Self {
            pool,
            gate: AdmissionGate::new(settings.admission_limit),
            acquire_timeout: settings.acquire_timeout(),
            schema_ready: Arc::new(OnceCell::new()),
        }
    }

    /// Build the pool from connection options and wrap it.
    pub async fn connect(
        options: PgConnectOptions,
        settings: &PoolSettings,
    ) -> Result<Self, sqlx::Error> {
        let pool = crate::create_pool(options, settings).await?;
        tracing::info!(
            pool_size = settings.pool_size,
            max_connections = settings.max_connections(),
            admission_limit = settings.admission_limit,
            "Database connection pool created"
        );
        Ok(Self::new(pool, settings))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn gate(&self) -> &AdmissionGate {
        &self.gate
    }

    /// Sessions currently admitted.
    pub fn in_flight(&self) -> usize {
        self.gate.in_flight()
    }

    /// Acquire a session, creating the schema on the first successful call.
    ///
    /// The gate wait and the pool wait share one `acquire_timeout` deadline.
    pub async fn acquire(&self) -> Result<Session, SessionError> {
        let deadline = Instant::now() + self.acquire_timeout;
        let permit = self.gate.enter(self.acquire_timeout).await?;

        self.schema_ready
            .get_or_try_init(|| ensure_schema(&self.pool))
            .await?;

        let remaining = deadline.saturating_duration_since(Instant::now());
        let conn = match tokio::time::timeout(remaining, self.pool.acquire()).await {
            Ok(Ok(conn)) => conn,
            Ok(Err(sqlx::Error::PoolTimedOut)) | Err(_) => {
                tracing::warn!(
                    waited_ms = self.acquire_timeout.as_millis() as u64,
                    "Connection pool exhausted"
                );
                return Err(SessionError::Exhausted {
                    waited: self.acquire_timeout,
                });
            }
            Ok(Err(other)) => return Err(SessionError::Database(other)),
        };

        tracing::debug!(in_flight = self.gate.in_flight(), "Session acquired");
        Ok(Session {
            conn,
            _permit: permit,
        })
    }

    /// Close every pooled connection. Pending and future acquisitions fail.
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("Database connection pool closed");
    }
}

/// One admitted, pooled connection. Derefs to [`PgConnection`].
#[derive(Debug)]
pub struct Session {
    conn: PoolConnection<Postgres>,
    _permit: AdmissionPermit,
}

impl Deref for Session {
    type Target = PgConnection;

    fn deref(&self) -> &PgConnection {
        &self.conn
    }
}

impl DerefMut for Session {
    fn deref_mut(&mut self) -> &mut PgConnection {
        &mut self.conn
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn defaults_match_documented_table() {
        let settings = PoolSettings::default();
        assert_eq!(settings.pool_size, 10);
        assert_eq!(settings.max_connections(), 20);
        assert_eq!(settings.admission_limit, 20);
        assert_eq!(settings.acquire_timeout(), Duration::from_secs(30));
    }

    #[tokio::test]
    async fn gate_bounds_concurrent_holders() {
        let gate = AdmissionGate::new(3);
        let active = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let tasks: Vec<_> = (0..12)
            .map(|_| {
                let gate = gate.clone();
                let active = Arc::clone(&active);
                let peak = Arc::clone(&peak);
                tokio::spawn(async move {
                    let _permit = gate.enter(Duration::from_secs(5)).await.unwrap();
                    let now = active.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(10)).await;
                    active.fetch_sub(1, Ordering::SeqCst);
                })
            })
            .collect();

        for task in tasks {
            task.await.unwrap();
        }

        assert!(peak.load(Ordering::SeqCst) <= 3);
        assert_eq!(gate.in_flight(), 0);
    }

    #[tokio::test]
    async fn saturated_gate_times_out() {
        let gate = AdmissionGate::new(1);
        let _held = gate.enter(Duration::from_secs(1)).await.unwrap();

        let result = gate.enter(Duration::from_millis(20)).await;
        assert_matches!(result, Err(SessionError::Exhausted { .. }));
        assert_eq!(gate.in_flight(), 1);
    }

    #[tokio::test]
    async fn dropping_a_permit_frees_the_slot() {
        let gate = AdmissionGate::new(1);
        let permit = gate.enter(Duration::from_secs(1)).await.unwrap();
        assert_eq!(gate.in_flight(), 1);
        drop(permit);
        assert_eq!(gate.in_flight(), 0);
        assert!(gate.enter(Duration::from_millis(20)).await.is_ok());
    }
}
