//! Application builder and server loop.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;

use filevault_core::config::AppConfig;
use filevault_core::error::AppError;
use filevault_database::FileVersionStore;

use crate::middleware::cors::build_cors_layer;
use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    let cors = build_cors_layer(&state.config.server.cors);
    build_router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Serves the API until `shutdown` is cancelled.
///
/// Request tokens are children of `shutdown`, so in-flight service calls are
/// cancelled the moment shutdown starts and do not get to finish their work.
/// `server.shutdown_grace_seconds` only bounds how long the server then waits
/// for those requests to answer and their connections to close.
pub async fn run_server(
    config: AppConfig,
    store: Arc<dyn FileVersionStore>,
    shutdown: CancellationToken,
) -> Result<(), AppError> {
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
    let backend = store.backend_name();

    let app = build_app(AppState::new(config, store, shutdown.clone()));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!(%addr, backend, "FileVault server listening");

    let server = axum::serve(listener, app).with_graceful_shutdown(shutdown.clone().cancelled_owned());
    let server = async move {
        server
            .await
            .map_err(|e| AppError::internal(format!("Server error: {e}")))
    };
    tokio::pin!(server);

    tokio::select! {
        result = &mut server => result,
        _ = shutdown.cancelled() => {
            tracing::info!(grace_seconds = grace.as_secs(), "Shutting down, draining connections");
            match tokio::time::timeout(grace, &mut server).await {
                Ok(result) => result,
                Err(_) => {
                    tracing::warn!("Grace period elapsed with connections still open");
                    Ok(())
                }
            }
        }
    }
}

/// Resolves on Ctrl+C or, on Unix, SIGTERM.
///
/// A signal handler that fails to install is logged and never fires.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
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

/// Cancels `shutdown` when the process receives a termination signal.
pub fn cancel_on_signal(shutdown: &CancellationToken) {
    let shutdown = shutdown.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received, starting graceful shutdown...");
        shutdown.cancel();
    });
}
