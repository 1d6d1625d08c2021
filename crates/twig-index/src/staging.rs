//! The staging area: at most one in-progress [`Tree`].
//!
//! The area is empty until the first [`StagingArea::add_files`] and is
//! emptied again when the repository seals the staged tree. All operations
//! are in-memory; producing blobs from files on disk is the caller's job.

use std::collections::BTreeMap;

use tracing::debug;
use twig_objects::{Entry, Tree};

use crate::error::{IndexError, IndexResult};

/// A batch of named entries to stage.
pub type Files = BTreeMap<String, Entry>;

/// The staging area: an optional tree accumulating entries for the next
/// commit.
#[derive(Clone, Debug, Default)]
pub struct StagingArea {
    tree: Option<Tree>,
}

impl StagingArea {
    /// Create an empty staging area.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if a tree is currently staged.
    pub fn is_staged(&self) -> bool {
        self.tree.is_some()
    }

    /// The staged tree, if any.
    pub fn tree(&self) -> Option<&Tree> {
        self.tree.as_ref()
    }

    /// Number of staged entries (0 when nothing is staged).
    pub fn len(&self) -> usize {
        self.tree.as_ref().map_or(0, Tree::len)
    }

    /// Returns `true` if nothing is staged or the staged tree has no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // ---------------------------------------------------------------
    // Stage operations
    // ---------------------------------------------------------------

    /// Merge `files` into the staging tree.
    ///
    /// With an explicit `target`, that tree becomes the staging tree (replacing
    /// any staged one). Without it, files go into the staged tree, or into a
    /// fresh empty tree when nothing is staged yet.
    ///
    /// Fails with [`IndexError::NoChangeDetected`] when every supplied
    /// `(name, entry)` pair is already present with an equal value. A matching
    /// name with a different entry, or a matching entry under a new name, is a
    /// change. On failure nothing is modified and `target` is not installed.
    pub fn add_files(&mut self, target: Option<Tree>, files: Files) -> IndexResult<()> {
        let unchanged = match (&target, &self.tree) {
            (Some(tree), _) | (None, Some(tree)) => tree.contains_all(&files),
            (None, None) => files.is_empty(),
        };
        if unchanged {
            return Err(IndexError::NoChangeDetected { count: files.len() });
        }

        let count = files.len();
        let tree = match target {
            Some(tree) => self.tree.insert(tree),
            None => self.tree.get_or_insert_with(Tree::new),
        };
        tree.merge(files);
        debug!(added = count, staged = tree.len(), "staged entries");
        Ok(())
    }

    /// Remove and return the staged tree, leaving the area empty.
    pub fn take(&mut self) -> Option<Tree> {
        self.tree.take()
    }

    /// Drop the staged tree.
    pub fn clear(&mut self) {
        self.tree = None;
    }
}
