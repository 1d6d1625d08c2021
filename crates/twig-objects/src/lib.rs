//! Content-addressed object model for twig.
//!
//! Every snapshot is built from three kinds of immutable-once-sealed
//! objects, each identified by the domain-separated digest of its own
//! content.
//!
//! # Object Types
//!
//! - [`Blob`] -- raw content (file contents, arbitrary data)
//! - [`Tree`] -- named entries, each either a blob or a nested tree
//! - [`Commit`] -- a tree sealed together with author, message, and time
//!
//! # Design Rules
//!
//! 1. An id is a pure function of current content. Trees cache their id and
//!    drop the cache on every mutation.
//! 2. Changing any leaf anywhere in a tree changes the id of every ancestor.
//! 3. A commit owns its tree and only hands out shared references to it.

pub mod commit;
pub mod error;
pub mod object;

// Re-export primary types at crate root for ergonomic imports.
pub use commit::Commit;
pub use error::{ObjectError, ObjectResult};
pub use object::{Blob, Entry, ObjectKind, Tree};
