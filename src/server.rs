//! HTTP server initialization and runtime setup.
//!
//! Handles storage selection, database connection, migrations, and the Axum
//! server lifecycle.

use crate::config::Config;
use crate::domain::clock::{AdjustableClock, Clock};
use crate::routes::app_router;
use crate::state::{AppState, Repositories};

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Service clock (pinned when `CLOCK_TODAY` is set)
/// - PostgreSQL pool with retried connection and migrations, or the
///   in-memory store when no database is configured
/// - Axum HTTP server with graceful shutdown
///
/// # Errors
///
/// Returns an error if:
/// - Database connection fails after all retries
/// - Migrations fail
/// - Server bind fails
pub async fn run(config: Config) -> Result<()> {
    let clock = build_clock(&config);
    let state = build_state(&config, clock).await?;

    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

fn build_clock(config: &Config) -> Arc<dyn Clock> {
    let clock = AdjustableClock::new();
    if let Some(today) = config.clock_today {
        clock.set_today(today);
        tracing::warn!(%today, "Service clock pinned");
    }
    Arc::new(clock)
}

async fn build_state(config: &Config, clock: Arc<dyn Clock>) -> Result<AppState> {
    let Some(database_url) = config.database_url.as_deref() else {
        tracing::warn!("No database configured, using in-memory storage");
        return Ok(AppState::in_memory(clock));
    };

    let pool = connect_with_retry(config, database_url).await?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Migrations applied");

    Ok(AppState::new(
        Repositories::postgres(Arc::new(pool)),
        clock,
        "postgres",
    ))
}

/// Connects to PostgreSQL, retrying with exponential backoff.
///
/// Makes `db_connect_retries` attempts in total.
async fn connect_with_retry(config: &Config, database_url: &str) -> Result<PgPool> {
    let options = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout));

    let strategy = ExponentialBackoff::from_millis(2)
        .factor(100)
        .max_delay(Duration::from_secs(10))
        .map(jitter)
        .take(config.db_connect_retries.saturating_sub(1));

    Retry::spawn(strategy, || {
        let options = options.clone();
        async move {
            options.connect(database_url).await.inspect_err(|e| {
                tracing::warn!(error = %e, "Database connection attempt failed");
            })
        }
    })
    .await
    .context("Failed to connect to database")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
