//! # filevault-api
//!
//! HTTP API layer for FileVault built on Axum.
//!
//! Exposes the version manager as REST endpoints with request logging,
//! CORS, a body-size cap, per-request cancellation, and error mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, cancel_on_signal, run_server, shutdown_signal};
pub use error::ApiError;
pub use state::AppState;
