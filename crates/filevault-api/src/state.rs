//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use filevault_core::config::AppConfig;
use filevault_database::FileVersionStore;
use filevault_service::VersionService;

/// Application state passed to every handler via `State<AppState>`.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Version manager
    pub version_service: Arc<VersionService>,
    /// Cancelled when the server begins shutting down; every request
    /// token is a child of this one.
    pub shutdown: CancellationToken,
}

impl AppState {
    /// Builds state around a record store.
    pub fn new(
        config: AppConfig,
        store: Arc<dyn FileVersionStore>,
        shutdown: CancellationToken,
    ) -> Self {
        let version_service = VersionService::new(store, config.versioning.clone());
        Self {
            config: Arc::new(config),
            version_service: Arc::new(version_service),
            shutdown,
        }
    }
}
