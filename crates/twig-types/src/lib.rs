//! Foundation types for twig.
//!
//! Every other twig crate depends on `twig-types` for the two values that
//! make history addressable and orderable.
//!
//! # Key Types
//!
//! - [`ObjectId`]: content-addressed identifier (32-byte digest)
//! - [`Timestamp`]: commit time with a logical tie-breaker

pub mod error;
pub mod object;
pub mod timestamp;

pub use error::TypeError;
pub use object::ObjectId;
pub use timestamp::Timestamp;
