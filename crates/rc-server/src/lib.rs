//! rc-server: HTTP front end for the reelcast streaming service.
//!
//! Wires the rc-core components into an Axum application:
//!
//! - `GET /video/{name}` byte-range streaming with bounded chunks
//! - Video listing, playback history, and health endpoints
//! - Background sweeping of expired cache entries
//! - Graceful shutdown via signal handling

pub mod context;
pub mod error;
pub mod middleware;
pub mod responder;
pub mod router;
pub mod routes;
pub mod sweeper;

use std::sync::Arc;
use std::time::Duration;

use rc_core::config::Config;
use tokio_util::sync::CancellationToken;

use crate::context::AppContext;

/// Start the reelcast server.
///
/// Builds the [`AppContext`], binds the listener, and serves until a
/// shutdown signal is received.
pub async fn start(config: Config) -> rc_core::Result<()> {
    for warning in config.validate() {
        tracing::warn!("Config warning: {warning}");
    }

    let static_dir = config.server.static_dir.clone();
    let host = config.server.host.clone();
    let port = config.server.port;
    let sweep_interval = config
        .cache
        .sweep_interval_secs
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs);

    tracing::info!(
        media_dir = %config.server.media_dir.display(),
        max_chunk_bytes = config.streaming.max_chunk_bytes(),
        cache_ttl_secs = config.cache.ttl_secs,
        "Initializing streaming service"
    );

    let ctx = AppContext::from_config(config);
    let cancel = CancellationToken::new();

    let sweeper_handle = sweep_interval.map(|interval| {
        tracing::info!("Cache sweeper running every {}s", interval.as_secs());
        tokio::spawn(sweeper::run_cache_sweeper(
            Arc::clone(ctx.cache()),
            interval,
            cancel.clone(),
        ))
    });

    let app = router::build_router(ctx, static_dir);

    let listener = tokio::net::TcpListener::bind((host.as_str(), port))
        .await
        .map_err(|e| {
            rc_core::Error::Internal(format!("Failed to bind to {host}:{port}: {e}"))
        })?;
    let addr = listener.local_addr()?;
    tracing::info!("Server running at http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cancel.clone()))
        .await
        .map_err(|e| rc_core::Error::Internal(format!("Server error: {e}")))?;

    // Signal background tasks to stop.
    cancel.cancel();
    if let Some(handle) = sweeper_handle {
        let _ = handle.await;
    }

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for a shutdown signal (SIGINT or SIGTERM) or cancellation.
async fn shutdown_signal(cancel: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
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
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down"),
        _ = cancel.cancelled() => tracing::info!("Shutdown requested"),
    }
}
