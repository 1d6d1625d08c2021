use twig_types::ObjectId;

/// Errors from decoding objects.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ObjectError {
    /// A decoded record carries an id that does not match its content.
    #[error("hash mismatch: record claims {claimed}, content hashes to {computed}")]
    HashMismatch {
        claimed: ObjectId,
        computed: ObjectId,
    },
}

/// Result alias for object operations.
pub type ObjectResult<T> = Result<T, ObjectError>;
