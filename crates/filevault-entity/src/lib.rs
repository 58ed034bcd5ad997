//! # filevault-entity
//!
//! Domain entity models for FileVault. Every struct in this crate
//! represents a database table row or a domain value object. Row types
//! additionally derive `sqlx::FromRow`.

pub mod file;
