use twig_index::IndexError;

/// Errors produced by repository operations.
///
/// Both variants are recoverable and leave the repository unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HistoryError {
    /// The files passed to `add_files` are all already staged unchanged.
    #[error("no changes detected")]
    NoChangeDetected,

    /// The tree to seal has no entries.
    #[error("tree is empty, nothing to commit")]
    EmptyTree,
}

impl From<IndexError> for HistoryError {
    fn from(err: IndexError) -> Self {
        match err {
            IndexError::NoChangeDetected { .. } => Self::NoChangeDetected,
        }
    }
}

/// Result alias for repository operations.
pub type HistoryResult<T> = Result<T, HistoryError>;
