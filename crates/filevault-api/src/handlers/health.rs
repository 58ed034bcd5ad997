//! Health check handler.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use filevault_database::FileVersionStore;

use crate::dto::response::HealthResponse;
use crate::state::AppState;

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let store = state.version_service.store();
    let healthy = match store.health_check().await {
        Ok(ok) => ok,
        Err(e) => {
            tracing::warn!(error = %e, "Record store health check failed");
            false
        }
    };

    let (status, label) = if healthy {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "unavailable")
    };

    (
        status,
        Json(HealthResponse {
            status: label.to_string(),
            backend: store.backend_name().to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}
