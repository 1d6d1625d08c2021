//! Error types for the index crate.

/// Errors that can occur during staging operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IndexError {
    /// Every supplied entry is already staged with the same value.
    #[error("no changes detected: all {count} entries are already staged")]
    NoChangeDetected { count: usize },
}

/// Convenience alias for index results.
pub type IndexResult<T> = Result<T, IndexError>;
