//! HTTP server initialization and runtime setup.
//!
//! Handles store connections, service wiring, and the Axum server lifecycle.

use crate::config::Config;
use crate::domain::repositories::KeyValueStore;
use crate::infrastructure::store::{MemoryStore, RedisStore};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;

/// Store handles for the two partitions.
pub struct Stores {
    pub links: Arc<dyn KeyValueStore>,
    pub quotas: Arc<dyn KeyValueStore>,
}

/// Connects one Redis handle per partition.
///
/// # Errors
///
/// Returns an error if either partition cannot be reached.
pub async fn connect_redis(redis_url: &str, config: &Config) -> Result<Stores> {
    let links = RedisStore::connect(redis_url, config.links_db)
        .await
        .context("Failed to connect links store")?;
    let quotas = RedisStore::connect(redis_url, config.quota_db)
        .await
        .context("Failed to connect quota store")?;

    Ok(Stores {
        links: Arc::new(links),
        quotas: Arc::new(quotas),
    })
}

/// Builds the partitions: Redis when configured, otherwise in-process.
///
/// A configured but unreachable Redis is a startup error.
async fn build_stores(config: &Config) -> Result<Stores> {
    match &config.redis_url {
        Some(redis_url) => connect_redis(redis_url, config).await,
        None => {
            tracing::warn!("Redis not configured, using in-memory store (single node only)");
            Ok(Stores {
                links: Arc::new(MemoryStore::new()),
                quotas: Arc::new(MemoryStore::new()),
            })
        }
    }
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Links and quota stores (Redis or in-memory fallback)
/// - Link, redirect and rate limiting services
/// - Axum HTTP server with graceful shutdown
///
/// # Errors
///
/// Returns an error if:
/// - Redis is configured but unreachable
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let stores = build_stores(&config).await?;

    let state = AppState::new(
        stores.links,
        stores.quotas,
        &config.shortener_settings(),
        config.behind_proxy,
    );

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

/// Resolves on Ctrl+C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
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

    tracing::info!("Shutdown signal received, draining connections");
}
