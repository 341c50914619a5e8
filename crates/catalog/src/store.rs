//! Record table on disk.

use crate::collection::Collection;
use crate::error::{ErrorKind, Result};
use crate::rows;
use exn::ResultExt;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind as IoErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

/// The CSV file holding every book.
///
/// There is no caching: every [`load`](Self::load) reads the whole file and
/// every [`save`](Self::save) rewrites it.
#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
}

impl RecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the whole table.
    ///
    /// A file that does not exist yet is an empty collection. A file that
    /// exists but cannot be parsed is [`Malformed`](ErrorKind::Malformed) and
    /// is left as it is.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn load(&self) -> Result<Collection> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(err) if err.kind() == IoErrorKind::NotFound => {
                debug!("Record table does not exist yet");
                return Ok(Collection::default());
            },
            Err(err) => return Err(err).or_raise(|| ErrorKind::Io),
        };
        if !file.metadata().or_raise(|| ErrorKind::Io)?.is_file() {
            exn::bail!(ErrorKind::Io);
        }
        let collection = rows::read_table(BufReader::new(file))?;
        debug!(books = collection.len(), "Loaded record table");
        Ok(collection)
    }

    /// Writes the whole table, replacing whatever was there.
    ///
    /// The table is written to a temporary file next to the target and renamed
    /// over it, so a failed save leaves the previous table intact.
    #[instrument(skip(self, collection), fields(path = %self.path.display(), books = collection.len()))]
    pub fn save(&self, collection: &Collection) -> Result<()> {
        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent).or_raise(|| ErrorKind::Io)?;

        let temp = tempfile::NamedTempFile::new_in(parent).or_raise(|| ErrorKind::Io)?;
        {
            let mut writer = BufWriter::new(temp.as_file());
            rows::write_table(&mut writer, collection)?;
            writer.flush().or_raise(|| ErrorKind::Io)?;
        }
        temp.as_file().sync_all().or_raise(|| ErrorKind::Io)?;
        temp.persist(&self.path).or_raise(|| ErrorKind::Io)?;
        debug!("Saved record table");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BookFields;
    use time::macros::date;

    fn one_book() -> Collection {
        let mut collection = Collection::default();
        collection.add(BookFields::new("كتاب1", "مؤلف1", date!(2020 - 05 - 01)), date!(2024 - 10 - 19)).unwrap();
        collection
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::new(dir.path().join("books_data.csv"));
        assert!(store.load().unwrap().is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::new(dir.path().join("nested").join("books_data.csv"));
        let collection = one_book();
        store.save(&collection).unwrap();
        assert_eq!(store.load().unwrap(), collection);

        // Saving again replaces rather than appends.
        store.save(&collection).unwrap();
        assert_eq!(store.load().unwrap().len(), 1);
    }

    #[test]
    fn test_save_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::new(dir.path().join("books_data.csv"));
        store.save(&one_book()).unwrap();
        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_malformed_file_is_not_repaired() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("books_data.csv");
        fs::write(&path, "not,a,book,table\n1,2,3,4\n").unwrap();
        let store = RecordStore::new(&path);
        let err = store.load().unwrap_err();
        assert!(matches!(*err, ErrorKind::Malformed { .. }));
        assert_eq!(fs::read_to_string(&path).unwrap(), "not,a,book,table\n1,2,3,4\n");
    }

    #[test]
    fn test_unreadable_path_is_io() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the file should be.
        let store = RecordStore::new(dir.path());
        let err = store.load().unwrap_err();
        assert_eq!(*err, ErrorKind::Io);
    }
}
