//! In-memory storage backend for testing.

use crate::StorageBackend;
use crate::error::{ErrorKind, Result};
use crate::models::FileInfo;
use crate::path::validate as validate_path;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};
use time::OffsetDateTime;

/// In-memory storage backend for testing.
///
/// Files are stored in a map behind a [`RwLock`], so all trait methods can
/// operate on `&self` without external synchronisation. Ideal for unit tests
/// that need a [`StorageBackend`] without touching the filesystem.
///
/// # Examples
///
/// ```
/// # #[cfg(feature = "mock")] {
/// use shelf_storage::backend::{MockBackend, StorageBackend};
/// use std::path::Path;
///
/// let backend = MockBackend::with_files([("dune_20240101120000.jpg", b"jpeg...")]);
/// assert!(backend.exists(Path::new("dune_20240101120000.jpg")).unwrap());
///
/// backend.create(Path::new("other.jpg"), b"jpeg...").unwrap();
/// assert!(backend.exists(Path::new("other.jpg")).unwrap());
/// # }
/// ```
pub struct MockBackend {
    name: String,
    storage: RwLock<BTreeMap<PathBuf, (OffsetDateTime, Vec<u8>)>>,
    fail_deletes: bool,
}

impl MockBackend {
    /// Create a mock backend pre-populated with files.
    ///
    /// Panics if any path fails validation (e.g. path traversal). If test
    /// setup is wrong, then test should not pass.
    pub fn with_files(files: impl IntoIterator<Item = (impl Into<PathBuf>, impl Into<Vec<u8>>)>) -> Self {
        let mut map = BTreeMap::new();
        let now = OffsetDateTime::now_utc();
        for (path, data) in files {
            let path = path.into();
            let Ok(validated) = validate_path(&path) else {
                panic!("MockBackend::with_files: invalid path {}", path.display());
            };
            map.insert(validated, (now, data.into()));
        }
        Self {
            name: "mock".to_string(),
            storage: RwLock::new(map),
            fail_deletes: false,
        }
    }

    /// Make every [`delete`](StorageBackend::delete) fail with
    /// [`PermissionDenied`](ErrorKind::PermissionDenied), leaving the file in
    /// place.
    pub fn with_failing_deletes(mut self) -> Self {
        self.fail_deletes = true;
        self
    }

    /// Number of files currently stored.
    pub fn len(&self) -> usize {
        self.storage.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Whether the backend holds no files at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
impl Default for MockBackend {
    fn default() -> Self {
        let files: [(&str, &str); 0] = [];
        Self::with_files(files)
    }
}

impl StorageBackend for MockBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn list(&self) -> Result<Vec<FileInfo>> {
        let guard = self.storage.read().unwrap_or_else(PoisonError::into_inner);
        Ok(guard
            .iter()
            // Nested paths stand in for subdirectories.
            .filter(|(path, _)| path.parent() == Some(Path::new("")))
            .map(|(path, (inserted, data))| FileInfo::new(path.clone(), data.len() as u64, *inserted))
            .collect())
    }

    fn exists(&self, path: &Path) -> Result<bool> {
        let path = validate_path(path)?;
        Ok(self.storage.read().unwrap_or_else(PoisonError::into_inner).contains_key(&path))
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        let path = validate_path(path)?;
        let guard = self.storage.read().unwrap_or_else(PoisonError::into_inner);
        let (_inserted, data) = guard.get(&path).ok_or_else(|| exn::Exn::from(ErrorKind::NotFound(path.clone())))?;
        Ok(data.clone())
    }

    fn create(&self, path: &Path, data: &[u8]) -> Result<()> {
        let path = validate_path(path)?;
        let mut guard = self.storage.write().unwrap_or_else(PoisonError::into_inner);
        if guard.contains_key(&path) {
            exn::bail!(ErrorKind::AlreadyExists(path));
        }
        guard.insert(path, (OffsetDateTime::now_utc(), data.to_vec()));
        Ok(())
    }

    fn delete(&self, path: &Path) -> Result<()> {
        let path = validate_path(path)?;
        if self.fail_deletes {
            exn::bail!(ErrorKind::PermissionDenied(path));
        }
        let mut guard = self.storage.write().unwrap_or_else(PoisonError::into_inner);
        match guard.remove(&path) {
            Some(_) => Ok(()),
            None => exn::bail!(ErrorKind::NotFound(path)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_read() {
        let backend = MockBackend::default();
        backend.create(Path::new("cover.jpg"), b"data").unwrap();
        assert_eq!(backend.read(Path::new("cover.jpg")).unwrap(), b"data");
        assert_eq!(backend.len(), 1);
    }

    #[test]
    fn test_create_never_overwrites() {
        let backend = MockBackend::with_files([("cover.jpg", b"first")]);
        let err = backend.create(Path::new("cover.jpg"), b"other").unwrap_err();
        assert!(matches!(&*err, ErrorKind::AlreadyExists(_)));
        assert_eq!(backend.read(Path::new("cover.jpg")).unwrap(), b"first");
    }

    #[test]
    fn test_delete() {
        let backend = MockBackend::with_files([("cover.jpg", b"data")]);
        backend.delete(Path::new("cover.jpg")).unwrap();
        assert!(backend.is_empty());
        let err = backend.delete(Path::new("cover.jpg")).unwrap_err();
        assert!(matches!(&*err, ErrorKind::NotFound(_)));
    }

    #[test]
    fn test_failing_deletes() {
        let backend = MockBackend::with_files([("cover.jpg", b"data")]).with_failing_deletes();
        let err = backend.delete(Path::new("cover.jpg")).unwrap_err();
        assert!(matches!(&*err, ErrorKind::PermissionDenied(_)));
        assert!(backend.exists(Path::new("cover.jpg")).unwrap());
    }

    #[test]
    fn test_list_is_flat() {
        let backend = MockBackend::with_files([("a/one.jpg", "1"), ("three.jpg", "333"), ("two.jpg", "22")]);
        let listed = backend.list().unwrap();
        let paths: Vec<_> = listed.iter().map(|f| f.path.as_path()).collect();
        assert_eq!(paths, vec![Path::new("three.jpg"), Path::new("two.jpg")]);
        assert_eq!(listed[0].size, 3);
    }
}
