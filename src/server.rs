//! Server startup and shutdown.
//!
//! `run_server` connects storage, runs migrations, builds the application
//! state and router, then serves until Ctrl+C or SIGTERM.

use crate::config::Config;
use crate::db::Repository;
use crate::error::{AppError, AppResult};
use crate::rate_limit::RateLimiter;
use crate::routes;
use crate::services::{LinkService, SlugGenerator};
use crate::state::AppState;
use crate::store::{LinkStore, MemoryStore};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

/// Where short links are kept for this run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres { migrate: bool },
    Memory,
}

/// Connect to the configured storage backend.
///
/// Failing to connect or migrate is fatal: the error propagates out of `main`.
pub async fn connect_storage(
    config: &Config,
    backend: StorageBackend,
) -> AppResult<Arc<dyn LinkStore>> {
    match backend {
        StorageBackend::Memory => {
            warn!("Using in-memory storage; links will not survive a restart");
            Ok(Arc::new(MemoryStore::new()))
        }
        StorageBackend::Postgres { migrate } => {
            info!("Connecting to database...");
            let repository = Repository::new(
                config.database_url()?,
                config.database.max_connections,
                config.database.min_connections,
                config.database.acquire_timeout_seconds,
            )
            .await?;

            if migrate {
                info!("Running database migrations...");
                repository.run_migrations().await?;
                info!("Migrations completed successfully");
            }

            Ok(Arc::new(repository))
        }
    }
}

/// Build the shared state handed to every handler.
pub fn build_state(config: &Config, store: Arc<dyn LinkStore>) -> Arc<AppState> {
    Arc::new(AppState {
        links: LinkService::new(store, SlugGenerator::from_entropy(), &config.link),
        rate_limiter: RateLimiter::from_config(&config.rate_limit),
    })
}

/// Run the web server with the given configuration.
///
/// # Errors
///
/// Returns an error if storage is unreachable, migrations fail, the address
/// cannot be bound, or the server stops with an I/O error.
pub async fn run_server(config: Config, addr: String, backend: StorageBackend) -> AppResult<()> {
    info!("Starting shortlink server...");

    let store = connect_storage(&config, backend).await?;
    store.ping().await?;

    let state = build_state(&config, store);
    let app = routes::create_router(state, &config.cors);

    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to bind to address {}: {}", addr, e)))?;

    info!("Server listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .map_err(|e| AppError::Internal(format!("Server error: {}", e)))?;

    info!("Server shutdown complete");
    Ok(())
}

/// Resolves when Ctrl+C (or SIGTERM on Unix) is received.
///
/// # Panics
///
/// Panics if the signal handlers cannot be installed.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(unix)]
    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    #[cfg(not(unix))]
    ctrl_c.await;

    info!("Shutdown signal received");
}
