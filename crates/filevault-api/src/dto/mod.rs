//! Data transfer objects.

pub mod response;

pub use response::{FileVersionResponse, HealthResponse, MessageResponse};
