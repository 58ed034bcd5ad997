//! Repository implementations backed by SQLite.

pub mod file_version;

pub use file_version::FileVersionRepository;
