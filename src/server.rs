//! HTTP server initialization and runtime setup.
//!
//! Handles the database pool, migrations, the session sweeper and the Axum
//! server lifecycle.

use crate::config::Config;
use crate::infrastructure::persistence::{PgSnippetRepository, PgUserRepository};
use crate::infrastructure::session::{PgSessionStore, SessionStore, spawn_cleanup_task};
use crate::routes::app_router;
use crate::state::AppState;
use crate::web::middleware::csrf::CsrfConfig;
use crate::web::session::SessionManager;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;

/// Builds the connection pool.
///
/// Every connection gets the configured `statement_timeout`, so a slow query
/// fails with a database error instead of holding the request open.
pub async fn connect_pool(config: &Config) -> Result<PgPool> {
    let pool = &config.pool;
    let mut options =
        PgConnectOptions::from_str(config.database_url.as_str()).context("Invalid DATABASE_URL")?;

    if let Some(limit) = pool.statement_timeout {
        options = options.options([("statement_timeout", limit.as_millis().to_string())]);
    }

    PgPoolOptions::new()
        .max_connections(pool.max_connections)
        .acquire_timeout(pool.acquire_timeout)
        .idle_timeout(pool.idle_timeout)
        .max_lifetime(pool.max_lifetime)
        .connect_with(options)
        .await
        .context("Failed to connect to database")
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool
/// - Apply migrations
/// - Expired-session sweeper
/// - Axum HTTP server with graceful shutdown
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = connect_pool(&config).await?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;

    let pool = Arc::new(pool);
    let session_store: Arc<dyn SessionStore> = Arc::new(PgSessionStore::new(pool.clone()));
    let sweeper = spawn_cleanup_task(session_store.clone(), config.session_cleanup_interval);
    tracing::info!("Session sweeper started");

    let state = AppState::new(
        Arc::new(PgSnippetRepository::new(pool.clone())),
        Arc::new(PgUserRepository::new(pool.clone())),
        SessionManager::new(session_store, config.cookie_secure),
        CsrfConfig {
            secure: config.cookie_secure,
        },
    );

    let app = app_router(state, &config.static_dir);

    let addr = config.listen_addr;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    sweeper.abort();
    pool.close().await;
    tracing::info!("Server stopped");

    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
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
