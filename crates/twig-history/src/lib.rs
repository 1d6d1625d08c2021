//! Repository core for twig.
//!
//! This crate ties the object model and the staging area together:
//! - `HistoryWriter` / `HistoryReader` trait boundaries
//! - `Repository`, the in-memory implementation
//! - `RepositoryConfig` for seal-time behaviour
//!
//! Callers stage named entries, seal them into a [`Commit`], and query the
//! append-only history. Persistence and presentation live outside this
//! crate.

pub mod config;
pub mod error;
pub mod memory;
pub mod traits;

pub use config::RepositoryConfig;
pub use error::{HistoryError, HistoryResult};
pub use memory::Repository;
pub use traits::{CommitPredicate, HistoryReader, HistoryWriter};

// Re-export the object model so callers need a single dependency.
pub use twig_index::Files;
pub use twig_objects::{Blob, Commit, Entry, ObjectKind, Tree};
pub use twig_types::{ObjectId, Timestamp};
