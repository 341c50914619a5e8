//! Local filesystem storage backend.
//!
//! Files are stored in a configured directory and accessed using standard
//! filesystem operations.

use crate::error::ErrorKind;
use crate::{FileInfo, StorageBackend, error::Result, path::validate as validate_path};
use std::fs::{self, Metadata};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Local filesystem storage backend.
///
/// Stores files in a directory on the local filesystem. All paths are relative
/// to the configured root directory.
///
/// # Examples
///
/// ```no_run
/// use shelf_storage::backend::LocalBackend;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let backend = LocalBackend::new("covers", "/path/to/books")?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct LocalBackend {
    name: String,
    /// Root directory for stored files
    root: PathBuf,
}
impl LocalBackend {
    /// Create a new local filesystem backend, creating the root directory if
    /// it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is not absolute, or if it exists but is
    /// not a directory.
    pub fn new(name: impl Into<String>, root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        if !root.is_absolute() {
            exn::bail!(ErrorKind::InvalidPath(root));
        }
        if root.exists() {
            if !root.is_dir() {
                exn::bail!(ErrorKind::InvalidPath(root));
            }
        } else {
            fs::create_dir_all(&root).map_err(|e| Self::map_io_error(e, &root))?;
        }
        Ok(Self { name: name.into(), root })
    }

    /// Root directory of this backend.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the absolute path for a relative storage path.
    ///
    /// Validates the path and joins it with the root directory.
    fn absolute_path(&self, path: impl AsRef<Path>) -> Result<PathBuf> {
        let validated = validate_path(path.as_ref())?;
        Ok(self.root.join(validated))
    }

    fn metadata(path: &Path, metadata: Metadata) -> Result<FileInfo> {
        let modified = metadata.modified().map_err(ErrorKind::Io)?.into();
        Ok(FileInfo::new(PathBuf::from(path), metadata.len(), modified))
    }

    fn map_io_error(e: std::io::Error, path: &Path) -> ErrorKind {
        match e.kind() {
            std::io::ErrorKind::NotFound => ErrorKind::NotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => ErrorKind::PermissionDenied(path.to_path_buf()),
            std::io::ErrorKind::AlreadyExists => ErrorKind::AlreadyExists(path.to_path_buf()),
            _ => ErrorKind::Io(e),
        }
    }
}

impl StorageBackend for LocalBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn list(&self) -> Result<Vec<FileInfo>> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            // The root was removed behind our back; there is nothing to list.
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => exn::bail!(Self::map_io_error(err, &self.root)),
        };
        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| Self::map_io_error(e, &self.root))?;
            let name = PathBuf::from(entry.file_name());
            let metadata = entry.metadata().map_err(|e| Self::map_io_error(e, &name))?;
            // Subdirectories, symlinks and the like are never covers.
            if metadata.is_file() {
                files.push(Self::metadata(&name, metadata)?);
            }
        }
        files.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(files)
    }

    fn exists(&self, path: &Path) -> Result<bool> {
        let abs_path = self.absolute_path(path)?;
        Ok(abs_path.try_exists().map_err(|e| Self::map_io_error(e, path))?)
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        let abs_path = self.absolute_path(path)?;
        Ok(fs::read(&abs_path).map_err(|e| Self::map_io_error(e, path))?)
    }

    fn create(&self, path: &Path, data: &[u8]) -> Result<()> {
        let abs_path = self.absolute_path(path)?;
        let parent = abs_path.parent().unwrap_or(&self.root);
        fs::create_dir_all(parent).map_err(|e| Self::map_io_error(e, path))?;
        // Stage the bytes next to the destination, then link them into place
        // only if nothing is there yet. Readers never see a half-written file.
        let mut staged = NamedTempFile::new_in(parent).map_err(|e| Self::map_io_error(e, path))?;
        staged.write_all(data).map_err(|e| Self::map_io_error(e, path))?;
        staged.as_file().sync_all().map_err(|e| Self::map_io_error(e, path))?;
        staged.persist_noclobber(&abs_path).map_err(|e| Self::map_io_error(e.error, path))?;
        tracing::debug!(backend = %self.name, path = %path.display(), bytes = data.len(), "Stored file");
        Ok(())
    }

    fn delete(&self, path: &Path) -> Result<()> {
        let abs_path = self.absolute_path(path)?;
        Ok(fs::remove_file(&abs_path).map_err(|e| Self::map_io_error(e, path))?)
    }
}
