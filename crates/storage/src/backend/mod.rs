//! Storage backend trait and implementations.
//!
//! This module defines the `StorageBackend` trait, which provides a unified
//! interface for blob storage (cover images) across different backends: the
//! local filesystem, or an in-memory map for tests.

mod local;
#[cfg(any(test, feature = "mock"))]
mod mock;

pub use self::local::LocalBackend;
#[cfg(any(test, feature = "mock"))]
pub use self::mock::MockBackend;
use crate::error::Result;
use crate::models::FileInfo;
use std::path::Path;

/// Unified interface for storage backends.
///
/// All operations are synchronous; every caller performs one short
/// load-mutate-save cycle per user action and nothing else runs in the
/// meantime. It's a glorified CRUD interface.
///
/// # Path Handling
/// All paths are relative to the storage root and must be validated using
/// [`validate_path`](crate::validate_path) before use. Implementations
/// enforce this validation.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use shelf_storage::{backend::StorageBackend, error::Result};
///
/// fn size_of_cover(backend: &dyn StorageBackend) -> Result<u64> {
///     let path = Path::new("dune_20240101120000.jpg");
///     if backend.exists(path)? {
///         Ok(backend.read(path)?.len() as u64)
///     } else {
///         Ok(0)
///     }
/// }
/// ```
pub trait StorageBackend: Send + Sync {
    /// Name of the configured backend (used for logging only).
    fn name(&self) -> &str;

    /// List the regular files directly under the storage root, sorted by
    /// path. Subdirectories are not descended into. A root that doesn't
    /// exist yields an empty list, not an error.
    fn list(&self) -> Result<Vec<FileInfo>>;

    /// Check if a file exists.
    fn exists(&self, path: &Path) -> Result<bool>;

    /// Read file contents.
    ///
    /// Returns [`NotFound`](crate::error::ErrorKind::NotFound) if the file
    /// does not exist.
    fn read(&self, path: &Path) -> Result<Vec<u8>>;

    /// Write a new file.
    ///
    /// Returns [`AlreadyExists`](crate::error::ErrorKind::AlreadyExists) if
    /// a file is already stored at `path`; existing contents are never
    /// replaced. Either the whole file appears or nothing does.
    ///
    /// # Notes
    /// - Implementations should create parent directories as needed.
    fn create(&self, path: &Path, data: &[u8]) -> Result<()>;

    /// Delete a file.
    ///
    /// Returns [`NotFound`](crate::error::ErrorKind::NotFound) if the file
    /// does not exist.
    fn delete(&self, path: &Path) -> Result<()>;
}
