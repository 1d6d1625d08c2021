use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::debug;
use twig_index::{Files, StagingArea};
use twig_objects::{Commit, Tree};
use twig_types::{ObjectId, Timestamp};

use crate::config::RepositoryConfig;
use crate::error::{HistoryError, HistoryResult};
use crate::traits::{CommitPredicate, HistoryReader, HistoryWriter};

/// In-memory repository: one staging area plus an append-only commit log.
///
/// All state sits behind a single `RwLock`. Writers hold the write lock for
/// the whole operation and validate before mutating, so a failed call leaves
/// nothing behind and readers never see a half-appended log.
pub struct Repository {
    config: RepositoryConfig,
    inner: RwLock<RepositoryState>,
}

#[derive(Default)]
struct RepositoryState {
    staging: StagingArea,
    commits: Vec<Arc<Commit>>,
    hash_index: HashMap<ObjectId, usize>,
    /// Latest commit time in history (not necessarily the last appended).
    latest: Option<Timestamp>,
}

impl Repository {
    /// Create an empty repository with the default configuration.
    pub fn new() -> Self {
        Self::with_config(RepositoryConfig::default())
    }

    pub fn with_config(config: RepositoryConfig) -> Self {
        let state = RepositoryState {
            commits: Vec::with_capacity(config.history_capacity),
            ..Default::default()
        };
        Self {
            config,
            inner: RwLock::new(state),
        }
    }

    pub fn config(&self) -> &RepositoryConfig {
        &self.config
    }

    // Writers never leave partial state, so a poisoned lock still guards
    // consistent data.
    fn read_state(&self) -> RwLockReadGuard<'_, RepositoryState> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, RepositoryState> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for Repository {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.read_state();
        f.debug_struct("Repository")
            .field("config", &self.config)
            .field("commits", &state.commits.len())
            .field("staged", &state.staging.len())
            .finish()
    }
}

impl RepositoryState {
    /// Seal time for a commit without an explicit time.
    fn next_time(&self, monotonic: bool) -> Timestamp {
        let now = Timestamp::now();
        match self.latest {
            Some(latest) if monotonic && !now.is_after(&latest) => latest.successor(),
            _ => now,
        }
    }

    fn seal(
        &mut self,
        target: Option<Tree>,
        author: &str,
        message: &str,
        time: Option<Timestamp>,
        monotonic: bool,
    ) -> HistoryResult<ObjectId> {
        let entries = match &target {
            Some(tree) => tree.len(),
            None => self.staging.len(),
        };
        if entries == 0 {
            return Err(HistoryError::EmptyTree);
        }

        let tree = match target {
            Some(tree) => {
                if self.staging.is_staged() {
                    debug!(
                        staged = self.staging.len(),
                        "sealing explicit tree; staged entries left in place"
                    );
                }
                tree
            }
            None => self.staging.take().unwrap_or_default(),
        };

        let time = time.unwrap_or_else(|| self.next_time(monotonic));
        let commit = Commit::new(tree, author, message, time);
        let id = commit.id();
        self.append(commit);

        debug!(commit = %id.short_hex(), author, entries, %time, "sealed commit");
        Ok(id)
    }

    fn append(&mut self, commit: Commit) {
        let position = self.commits.len();
        // The first commit with a given id keeps the index slot.
        self.hash_index.entry(commit.id()).or_insert(position);
        let time = commit.time();
        self.latest = Some(self.latest.map_or(time, |latest| latest.max(time)));
        self.commits.push(Arc::new(commit));
    }
}

impl HistoryWriter for Repository {
    fn add_files(&self, target: Option<Tree>, files: Files) -> HistoryResult<()> {
        self.write_state().staging.add_files(target, files)?;
        Ok(())
    }

    fn commit(
        &self,
        target: Option<Tree>,
        author: &str,
        message: &str,
    ) -> HistoryResult<ObjectId> {
        self.write_state()
            .seal(target, author, message, None, self.config.monotonic_time)
    }

    fn commit_at(
        &self,
        target: Option<Tree>,
        author: &str,
        message: &str,
        time: Timestamp,
    ) -> HistoryResult<ObjectId> {
        self.write_state()
            .seal(target, author, message, Some(time), self.config.monotonic_time)
    }

    fn commit_files(&self, files: Files, author: &str, message: &str) -> HistoryResult<ObjectId> {
        let mut state = self.write_state();
        state.staging.add_files(None, files)?;
        state.seal(None, author, message, None, self.config.monotonic_time)
    }
}

impl HistoryReader for Repository {
    fn list_commits(&self) -> Vec<Arc<Commit>> {
        self.read_state().commits.clone()
    }

    fn find_commit(&self, predicate: CommitPredicate<'_>) -> Option<Arc<Commit>> {
        // `min_by_key` keeps the first of equal keys, so ties resolve to
        // creation order.
        self.read_state()
            .commits
            .iter()
            .filter(|commit| predicate(commit))
            .min_by_key(|commit| commit.time())
            .cloned()
    }

    fn find_commits(&self, predicate: CommitPredicate<'_>) -> Vec<Arc<Commit>> {
        self.read_state()
            .commits
            .iter()
            .filter(|commit| predicate(commit))
            .cloned()
            .collect()
    }

    fn find_commit_by_hash(&self, id: &ObjectId) -> Option<Arc<Commit>> {
        let state = self.read_state();
        state
            .hash_index
            .get(id)
            .and_then(|&position| state.commits.get(position))
            .cloned()
    }

    fn head(&self) -> Option<Arc<Commit>> {
        self.read_state().commits.last().cloned()
    }

    fn commit_count(&self) -> usize {
        self.read_state().commits.len()
    }

    fn staged(&self) -> Option<Tree> {
        self.read_state().staging.tree().cloned()
    }
}
