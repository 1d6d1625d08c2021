//! Staging area for twig.
//!
//! Holds the single mutable tree that accumulates entries between commits,
//! and decides what counts as "no change".
//!
//! # Key Types
//!
//! - [`StagingArea`] -- The optional in-progress tree
//! - [`Files`] -- A batch of named entries to stage
//! - [`IndexError`] -- Staging failures

pub mod error;
pub mod staging;

pub use error::{IndexError, IndexResult};
pub use staging::{Files, StagingArea};
