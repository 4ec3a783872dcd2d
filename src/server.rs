//! HTTP server initialization and runtime setup.
//!
//! Handles the storage backend choice, migrations, and the Axum server lifecycle.

use crate::config::Config;
use crate::infrastructure::persistence::{InMemoryStore, PgEventRepository, PgLinkRepository};
use crate::routes::app_router;
use crate::state::AppState;
use crate::utils::visitor_hash::VisitorHasher;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool and migrations, or the in-memory store
/// - Application services
/// - Axum HTTP server with graceful shutdown on Ctrl-C / SIGTERM
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let state = build_state(&config).await?;

    let app = app_router(state);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid listen address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn build_state(config: &Config) -> Result<AppState> {
    let hasher = VisitorHasher::new(config.visitor_hash_secret.clone());

    let Some(database_url) = &config.database_url else {
        tracing::warn!("No database configured, using in-memory store; data will not persist");
        return Ok(AppState::in_memory(
            Arc::new(InMemoryStore::new()),
            hasher,
            config.public_base_url.clone(),
        ));
    };

    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .connect(database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to migrate")?;

    let pool = Arc::new(pool);
    let links = Arc::new(PgLinkRepository::new(pool.clone()));
    let events = Arc::new(PgEventRepository::new(pool));

    Ok(AppState::new(
        links,
        events,
        hasher,
        config.public_base_url.clone(),
        config.analytics_precomputed,
        "postgres",
    ))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => tracing::error!("Failed to listen for SIGTERM: {}", e),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
