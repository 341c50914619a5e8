//! Path validation.
//!
//! Every path handed to a backend is relative to that backend's root and must
//! never escape it.

use std::path::{Component, Path, PathBuf};

use crate::error::{ErrorKind, Result};

/// Validates a storage path for security and correctness.
/// Ensures that paths don't escape the storage root (no `..` traversal).
///
/// > **Note:** This does **not** normalize backslashes, non-UTF8 bytes, or
/// >           platform-specific weirdness. Null bytes are explicitly rejected.
///
/// # Returns
/// Returns the normalized path if valid, or [`InvalidPath`](crate::error::ErrorKind::InvalidPath)
/// if invalid.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use shelf_storage::validate_path;
/// // Valid paths
/// assert!(validate_path("covers/dune_20240101120000.jpg").is_ok());
/// assert!(validate_path("a/../cover.jpg").is_ok()); // (never leaves root)
/// // Invalid paths
/// assert!(validate_path("../etc/passwd").is_err());
/// assert!(validate_path("a/../../b").is_err());
/// assert!(validate_path("a\0b").is_err());
/// // Paths get resolved
/// assert_eq!(validate_path("wrong/.././correct//./cover.jpg/").unwrap(), Path::new("correct/cover.jpg"));
/// ```
pub fn validate(path: impl AsRef<Path>) -> Result<PathBuf> {
    let mut components = Vec::new();
    for component in path.as_ref().components() {
        match component {
            Component::Normal(s) => {
                // Null bytes pass through Path::components() on Unix but cause
                // truncation in C-based syscalls.
                if s.as_encoded_bytes().contains(&0) {
                    exn::bail!(ErrorKind::InvalidPath(path.as_ref().to_path_buf()));
                }
                components.push(s)
            },
            Component::CurDir | Component::RootDir => {},
            Component::Prefix(_) => exn::bail!(ErrorKind::InvalidPath(path.as_ref().to_path_buf())),
            Component::ParentDir => {
                if components.pop().is_none() {
                    exn::bail!(ErrorKind::InvalidPath(path.as_ref().to_path_buf()));
                }
            },
        }
    }
    match components.is_empty() {
        true => exn::bail!(ErrorKind::InvalidPath(path.as_ref().to_path_buf())),
        false => Ok(components.into_iter().collect()),
    }
}

/// Validates a bare filename: a single path component that stays in the
/// storage root, with no directory part at all.
///
/// Cover assets live in a flat directory, so anything with a separator in it
/// did not come from the cover store.
///
/// ```
/// use shelf_storage::validate_filename;
/// assert!(validate_filename("dune_20240101120000.jpg").is_ok());
/// assert!(validate_filename("nested/dune.jpg").is_err());
/// assert!(validate_filename("../dune.jpg").is_err());
/// ```
pub fn validate_flat(name: impl AsRef<Path>) -> Result<PathBuf> {
    let name = name.as_ref();
    let mut components = name.components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => validate(name),
        _ => exn::bail!(ErrorKind::InvalidPath(name.to_path_buf())),
    }
}
