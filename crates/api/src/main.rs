use std::net::SocketAddr;

use anyhow::Context;
use fishsense_api::config::AppConfig;
use fishsense_api::router::build_app_router;
use fishsense_api::state::AppState;
use fishsense_db::SessionManager;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "fishsense_api=debug,fishsense_db=debug,tower_http=debug";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_FILTER.into());
    let json_logs = std::env::var("LOG_FORMAT").is_ok_and(|format| format == "json");
    let registry = tracing_subscriber::registry().with(filter);
    if json_logs {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    // --- Configuration ---
    let config = AppConfig::load().context("Failed to load configuration")?;
    tracing::info!(
        host = %config.server.host,
        port = config.server.port,
        postgres = ?config.postgres,
        "Loaded configuration"
    );

    // --- Database ---
    // The schema is created lazily by the first session.
    let sessions = SessionManager::connect(config.postgres.connect_options(), &config.pool)
        .await
        .context("Failed to connect to database")?;

    // --- App state ---
    let state = AppState {
        sessions: sessions.clone(),
    };
    let app = build_app_router(state, &config.server);

    // --- Start server ---
    let ip = config
        .server
        .host
        .parse()
        .with_context(|| format!("Invalid server host `{}`", config.server.host))?;
    let addr = SocketAddr::new(ip, config.server.port);
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");
    sessions.close().await;
    tracing::info!("Graceful shutdown complete");
    Ok(())
}

/// Wait for SIGINT or, on Unix, SIGTERM.
///
/// If a handler cannot be installed that branch never resolves; the other
/// still triggers shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "Failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
