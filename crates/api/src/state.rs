use fishsense_db::SessionManager;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: clones share the session manager.
#[derive(Clone)]
pub struct AppState {
    /// Pooled, admission-gated database sessions.
    pub sessions: SessionManager,
}
