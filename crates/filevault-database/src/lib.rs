//! # filevault-database
//!
//! Durable storage for file version rows. The [`FileVersionStore`] trait is
//! the record-store contract the version manager consumes; it knows nothing
//! about versioning rules beyond enforcing that `(logical_id, version)` and
//! row ids are unique.
//!
//! Two implementations are provided: [`FileVersionRepository`] on SQLite
//! and [`MemoryFileVersionStore`] for tests and ephemeral deployments.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use memory::MemoryFileVersionStore;
pub use repositories::FileVersionRepository;
pub use store::{FileVersionStore, open_store};
