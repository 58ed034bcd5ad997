//! # filevault-service
//!
//! Business logic for FileVault. [`VersionService`] implements the
//! versioning protocol on top of a [`FileVersionStore`]: it mints logical
//! ids, computes next version numbers, and decides what an update or a
//! delete means in terms of rows.
//!
//! Services take all their dependencies at construction time as `Arc`
//! references.
//!
//! [`FileVersionStore`]: filevault_database::FileVersionStore

pub mod file;

pub use file::VersionService;
