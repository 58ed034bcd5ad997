//! File versioning services.

pub mod version;

pub use version::VersionService;
