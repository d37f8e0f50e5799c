//! Store error types.

use thiserror::Error;

/// Errors that can occur during store operations.
///
/// Absence of a record is not an error: lookups return `Ok(None)` or an
/// empty list, and deleting a missing key is a no-op.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing document cannot be read or written.
    #[error("storage unavailable: {0}")]
    Unavailable(#[from] std::io::Error),

    /// The backing document exists but does not parse as a store document.
    #[error("corrupt store document: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
