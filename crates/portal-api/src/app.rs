//! Application builder: wires router, state and worker into a running server.

use std::time::Duration;

use axum::Router;
use sqlx::PgPool;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use portal_core::config::AppConfig;
use portal_core::error::AppError;

use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    build_router(state)
}

/// Runs the portal server until Ctrl+C or SIGTERM.
///
/// `on_start` receives the built state and a shutdown receiver, so the
/// caller can start background work such as the report scheduler. The
/// returned handle is awaited for up to `server.shutdown_grace_seconds`
/// once the listener has drained.
pub async fn run_server<F, Fut>(
    config: AppConfig,
    db_pool: PgPool,
    on_start: F,
) -> Result<(), AppError>
where
    F: FnOnce(AppState, watch::Receiver<bool>) -> Fut,
    Fut: std::future::Future<Output = Result<Option<JoinHandle<()>>, AppError>>,
{
    tracing::info!("Starting portal server...");

    let state = AppState::build(config.clone(), db_pool)?;
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let background = on_start(state.clone(), shutdown_rx).await?;

    let app = build_app(state);
    let addr = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!(address = %addr, "Portal server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            tracing::info!("Shutdown signal received, starting graceful shutdown...");
            let _ = shutdown_tx.send(true);
        })
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    if let Some(handle) = background {
        let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
        if tokio::time::timeout(grace, handle).await.is_err() {
            tracing::warn!(
                grace_seconds = config.server.shutdown_grace_seconds,
                "Background tasks did not stop within the grace period"
            );
        }
    }

    tracing::info!("Portal server shut down gracefully");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
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
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
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
}
