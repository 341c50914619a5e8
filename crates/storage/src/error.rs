//! Storage Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use std::io::Error as IoError;
use std::path::PathBuf;

/// A storage error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for storage operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// File does not exist
    #[display("file not found: {}", _0.display())]
    NotFound(#[error(not(source))] PathBuf),
    /// Access denied (permissions)
    #[display("permission denied: {}", _0.display())]
    PermissionDenied(#[error(not(source))] PathBuf),
    /// File already exists (for operations that require new files)
    #[display("file already exists: {}", _0.display())]
    AlreadyExists(#[error(not(source))] PathBuf),
    /// Underlying I/O error
    #[display("I/O error: {_0}")]
    Io(IoError),
    /// Path contains invalid characters or escapes root
    #[display("invalid path: {}", _0.display())]
    InvalidPath(#[error(not(source))] PathBuf),
    /// Backend-specific error
    #[display("backend error: {_0}")]
    BackendError(#[error(not(source))] String),
}
impl From<IoError> for ErrorKind {
    fn from(err: IoError) -> Self {
        Self::Io(err)
    }
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    ///
    /// [`AlreadyExists`](Self::AlreadyExists) is retryable: generated names
    /// embed a timestamp, so trying again a second later picks a new name.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Io(_) | Self::AlreadyExists(_) | Self::BackendError(_))
    }

    /// Returns `true` if the error means "there is nothing there".
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(ErrorKind::NotFound(PathBuf::from("a.jpg")).to_string(), "file not found: a.jpg");
        assert_eq!(ErrorKind::AlreadyExists(PathBuf::from("b.jpg")).to_string(), "file already exists: b.jpg");
    }

    #[test]
    fn test_retryable() {
        assert!(ErrorKind::AlreadyExists(PathBuf::from("b.jpg")).is_retryable());
        assert!(!ErrorKind::NotFound(PathBuf::from("a.jpg")).is_retryable());
        assert!(!ErrorKind::InvalidPath(PathBuf::from("../a.jpg")).is_retryable());
    }
}
