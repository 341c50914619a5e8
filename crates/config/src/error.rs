//! Config Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A configuration error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for configuration operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// An explicitly requested config file does not exist.
    #[display("config file not found: {}", _0.display())]
    MissingFile(#[error(not(source))] PathBuf),
    /// The config file extension is not one of toml, yaml, yml or json.
    #[display("unsupported config format: {}", _0.display())]
    UnsupportedFormat(#[error(not(source))] PathBuf),
    /// A provider could not be read or its values have the wrong shape.
    #[display("could not extract configuration")]
    Extract,
    /// A path setting is empty.
    #[display("{_0} must not be empty")]
    EmptyPath(#[error(not(source))] &'static str),
    /// The record table and the cover directory point at the same place.
    #[display("data_file and covers_dir must differ")]
    SamePath,
    /// The record table lives inside the cover directory, where pruning
    /// unreferenced covers could reach it.
    #[display("data_file must not be inside covers_dir")]
    DataFileInCoversDir,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        false
    }
}
