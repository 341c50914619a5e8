//! Library Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use shelf_catalog::error::{Error as CatalogError, ErrorKind as CatalogErrorKind};

/// A library error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Classifies the origin of a shelf failure.
///
/// ### Operational Errors
/// - [`ErrorKind::InvalidImage`]
/// - [`ErrorKind::CoverExists`]
///
/// ### Dependency Errors
/// - [`ErrorKind::Catalog`] carries the record store's own classification,
///   so callers can tell a validation failure from a malformed table.
/// - [`ErrorKind::Storage`]
/// - [`ErrorKind::Encode`]
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Loading, changing or saving the record table failed.
    #[display("catalog error: {_0}")]
    Catalog(CatalogErrorKind),
    /// The cover store could not be read or written.
    #[display("cover storage error")]
    Storage,
    /// A cover with the generated name already exists; nothing was
    /// overwritten. Trying again a second later picks a new name.
    #[display("cover already exists: {_0}")]
    CoverExists(#[error(not(source))] String),
    /// The uploaded bytes are not an image format we can decode.
    #[display("cover image could not be decoded")]
    InvalidImage,
    /// Re-encoding the cover as JPEG failed.
    #[display("cover image could not be encoded")]
    Encode,
    /// A configured path could not be resolved.
    #[display("invalid path in configuration")]
    Config,
}

impl ErrorKind {
    /// Convert a catalog error into a library error, preserving the catalog
    /// crate's `Exn` frame (error tree) as a child in its own error tree.
    #[track_caller]
    pub fn catalog(err: CatalogError) -> Error {
        let inner = (*err).clone();
        err.raise(ErrorKind::Catalog(inner))
    }

    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Catalog(inner) => inner.is_retryable(),
            Self::CoverExists(_) => true,
            _ => false,
        }
    }
}
