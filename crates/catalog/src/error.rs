//! Catalog Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use crate::models::BookId;
use derive_more::{Display, Error};

/// A catalog error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for catalog operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// A required field was left empty. Nothing was changed.
    #[display("{_0} must not be empty")]
    Validation(#[error(not(source))] &'static str),
    /// A value was out of range or not one of the known labels.
    #[display("invalid {_0}")]
    InvalidData(#[error(not(source))] &'static str),
    /// No book carries the requested identifier.
    #[display("book not found: {_0}")]
    NotFound(#[error(not(source))] BookId),
    /// No book sits at the requested position.
    #[display("no book at position {_0}")]
    OutOfBounds(#[error(not(source))] usize),
    /// The record table has an unexpected structure. It is not repaired.
    #[display("malformed record table at line {line}")]
    Malformed { line: u64 },
    /// Every book identifier has been handed out. Nothing was changed.
    #[display("no book identifiers left")]
    IdsExhausted,
    /// Reading or writing the record table failed.
    #[display("I/O error")]
    Io,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Io)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(ErrorKind::Validation("title").to_string(), "title must not be empty");
        assert_eq!(ErrorKind::NotFound(BookId::new(7)).to_string(), "book not found: 7");
        assert_eq!(ErrorKind::Malformed { line: 3 }.to_string(), "malformed record table at line 3");
    }

    #[test]
    fn test_retryable() {
        assert!(ErrorKind::Io.is_retryable());
        assert!(!ErrorKind::Validation("author").is_retryable());
        assert!(!ErrorKind::Malformed { line: 1 }.is_retryable());
    }
}
