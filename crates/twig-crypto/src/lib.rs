//! Hashing primitive for twig.
//!
//! Provides domain-separated BLAKE3 hashing. Every object identity in the
//! workspace (blob, tree, commit) is derived through [`ContentHasher`].
//!
//! Digests come straight from the `blake3` crate; twig adds only the domain tags.

pub mod hasher;

pub use hasher::ContentHasher;
