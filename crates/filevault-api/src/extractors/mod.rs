//! Custom Axum extractors.

pub mod cancel;
pub mod path;

pub use cancel::RequestCancellation;
