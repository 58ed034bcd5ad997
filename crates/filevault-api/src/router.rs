//! Route definitions for the FileVault HTTP API.
//!
//! All routes are mounted under `/api`.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::get,
};

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the Axum router with all routes and the body-size cap.
pub fn build_router(state: AppState) -> Router {
    let max_upload = usize::try_from(state.config.server.max_upload_size_bytes).unwrap_or(usize::MAX);

    let api_routes = Router::new().merge(file_routes()).merge(health_routes());

    Router::new()
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(max_upload))
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// File version CRUD.
///
/// The first segment after `/files` is a row id or a logical file id
/// depending on the route; each handler parses it accordingly.
fn file_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/files",
            get(handlers::file::list_files).post(handlers::file::create_file),
        )
        .route(
            "/files/{id}",
            get(handlers::file::download_by_row_id)
                .put(handlers::file::update_file)
                .delete(handlers::file::delete_by_row_id),
        )
        .route("/files/{id}/latest", get(handlers::file::download_latest))
        .route(
            "/files/{id}/{version}",
            get(handlers::file::download_version).delete(handlers::file::delete_version),
        )
}

fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
