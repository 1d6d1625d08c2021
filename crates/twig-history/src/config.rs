use serde::{Deserialize, Serialize};

/// Configuration for a [`Repository`](crate::Repository).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositoryConfig {
    /// When `true`, a commit sealed without an explicit time is stamped
    /// strictly after the latest time already in history, even if the wall
    /// clock has not advanced or has gone backwards. Explicit times passed to
    /// `commit_at` are never adjusted.
    pub monotonic_time: bool,
    /// Initial capacity of the commit log.
    pub history_capacity: usize,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            monotonic_time: true,
            history_capacity: 0,
        }
    }
}

impl RepositoryConfig {
    /// Stamp default seal times straight from the wall clock.
    ///
    /// Commits sealed within the same millisecond then share a time, and
    /// `find_commit` falls back to creation order among them.
    pub fn wall_clock() -> Self {
        Self {
            monotonic_time: false,
            ..Default::default()
        }
    }

    /// Pre-size the commit log.
    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }
}
