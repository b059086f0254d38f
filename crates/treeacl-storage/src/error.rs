//! Storage error types.

use thiserror::Error;

/// Storage-specific errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Page not found.
    #[error("page not found: {uid}")]
    PageNotFound { uid: u64 },

    /// Parent pointers of the stored pages form a loop.
    #[error("page tree is corrupt: page {uid} is its own ancestor")]
    CorruptTree { uid: u64 },

    /// Invalid input error.
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
