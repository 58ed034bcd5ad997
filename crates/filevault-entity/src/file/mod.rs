//! File version domain entities.

pub mod candidate;
pub mod version;

pub use candidate::FileCandidate;
pub use version::{FileVersion, NewFileVersion};
