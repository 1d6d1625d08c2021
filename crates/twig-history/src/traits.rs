use std::sync::Arc;

use twig_index::Files;
use twig_objects::{Commit, Tree};
use twig_types::{ObjectId, Timestamp};

use crate::error::HistoryResult;

/// A boolean test over a commit, used by the history queries.
pub type CommitPredicate<'a> = &'a dyn Fn(&Commit) -> bool;

/// Write boundary: staging and sealing.
pub trait HistoryWriter: Send + Sync {
    /// Merge `files` into the staging tree (or into `target`, which then
    /// becomes the staging tree).
    fn add_files(&self, target: Option<Tree>, files: Files) -> HistoryResult<()>;

    /// Seal `target`, else the staged tree, at the current time and append
    /// the commit to history.
    fn commit(&self, target: Option<Tree>, author: &str, message: &str)
        -> HistoryResult<ObjectId>;

    /// Like [`commit`](Self::commit), with a caller-supplied time.
    fn commit_at(
        &self,
        target: Option<Tree>,
        author: &str,
        message: &str,
        time: Timestamp,
    ) -> HistoryResult<ObjectId>;

    /// Stage `files` and seal the staging tree as one step; no other writer
    /// can run in between.
    fn commit_files(&self, files: Files, author: &str, message: &str) -> HistoryResult<ObjectId>;
}

/// Read boundary: queries over sealed history.
pub trait HistoryReader: Send + Sync {
    /// All commits in creation order.
    fn list_commits(&self) -> Vec<Arc<Commit>>;

    /// The earliest commit by time that matches `predicate`.
    fn find_commit(&self, predicate: CommitPredicate<'_>) -> Option<Arc<Commit>>;

    /// Every commit matching `predicate`, in creation order.
    fn find_commits(&self, predicate: CommitPredicate<'_>) -> Vec<Arc<Commit>>;

    fn find_commit_by_hash(&self, id: &ObjectId) -> Option<Arc<Commit>>;

    /// The most recently appended commit.
    fn head(&self) -> Option<Arc<Commit>>;

    fn commit_count(&self) -> usize;

    /// A copy of the staged tree, if anything is staged.
    fn staged(&self) -> Option<Tree>;
}
