use crate::covers::Covers;
use crate::error::{ErrorKind, Result};
use exn::{OptionExt, ResultExt};
use shelf_catalog::error::ErrorKind as CatalogErrorKind;
use shelf_catalog::{Book, BookFields, BookId, Collection, Filter, RecordStore, Stats};
use shelf_config::Config;
use shelf_storage::BackendHandle;
use shelf_storage::backend::LocalBackend;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// What to do with a book's cover when editing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoverChange<'a> {
    /// Leave the current cover (or lack of one) alone.
    Keep,
    /// Store these image bytes as the new cover.
    Replace(&'a [u8]),
    /// Drop the current cover.
    Clear,
}

/// The record table and its cover images, kept consistent with each other.
///
/// Nothing is cached between calls: each operation is a complete
/// load, change, save cycle against the record table.
pub struct Shelf {
    records: RecordStore,
    covers: Covers,
}

impl Shelf {
    /// Opens the shelf described by `config`, creating the cover directory if
    /// needed. Relative paths resolve against the working directory, and the
    /// record table must not end up inside the cover directory.
    pub fn open(config: &Config) -> Result<Self> {
        config.validate().or_raise(|| ErrorKind::Config)?;
        let data_file = std::path::absolute(&config.data_file).or_raise(|| ErrorKind::Config)?;
        let covers_dir = std::path::absolute(&config.covers_dir).or_raise(|| ErrorKind::Config)?;
        if data_file.starts_with(&covers_dir) {
            exn::bail!(ErrorKind::Config);
        }
        let backend = LocalBackend::new("covers", &covers_dir).or_raise(|| ErrorKind::Storage)?;
        debug!(data_file = %data_file.display(), covers_dir = %covers_dir.display(), "Opened shelf");
        Ok(Self::new(RecordStore::new(data_file), Arc::new(backend)))
    }

    pub fn new(records: RecordStore, backend: BackendHandle) -> Self {
        Self { records, covers: Covers::new(backend) }
    }

    pub fn records(&self) -> &RecordStore {
        &self.records
    }

    pub fn covers(&self) -> &Covers {
        &self.covers
    }

    fn load(&self) -> Result<Collection> {
        self.records.load().map_err(ErrorKind::catalog)
    }

    fn save(&self, collection: &Collection) -> Result<()> {
        self.records.save(collection).map_err(ErrorKind::catalog)
    }

    /// Books matching `filter`, in table order.
    pub fn books(&self, filter: &Filter) -> Result<Vec<Book>> {
        Ok(self.load()?.filter(filter).cloned().collect())
    }

    pub fn book(&self, id: BookId) -> Result<Option<Book>> {
        Ok(self.load()?.get(id).cloned())
    }

    pub fn stats(&self) -> Result<Stats> {
        Ok(self.load()?.stats())
    }

    /// Adds a book, stamped with today's date, with an optional cover.
    ///
    /// Fields are validated before anything is touched. If the table cannot
    /// be saved the freshly stored cover is removed again.
    #[instrument(skip_all, fields(title = %fields.title))]
    pub fn add(&self, fields: BookFields, cover: Option<&[u8]>) -> Result<Book> {
        fields.validate().map_err(ErrorKind::catalog)?;
        let mut collection = self.load()?;
        let stored = cover.map(|bytes| self.covers.store(bytes, fields.title.trim())).transpose()?;

        let id = collection.add(fields, crate::now().date()).map_err(ErrorKind::catalog)?.id;
        if let Some(name) = &stored {
            collection.set_cover(id, Some(name.clone())).map_err(ErrorKind::catalog)?;
        }
        if let Err(err) = self.save(&collection) {
            if let Some(name) = &stored {
                self.covers.remove(name);
            }
            return Err(err);
        }
        info!(%id, cover = stored.as_deref(), "Added book");
        Self::cloned(&collection, id)
    }

    /// Replaces every editable field of a book and applies the cover change.
    ///
    /// A replaced or cleared cover is removed once the table is saved, unless
    /// another book still refers to it.
    #[instrument(skip(self, fields, cover))]
    pub fn update(&self, id: BookId, fields: BookFields, cover: CoverChange<'_>) -> Result<Book> {
        fields.validate().map_err(ErrorKind::catalog)?;
        let mut collection = self.load()?;
        let title = collection.update(id, fields).map_err(ErrorKind::catalog)?.title.clone();

        let (stored, previous) = match cover {
            CoverChange::Keep => (None, None),
            CoverChange::Replace(bytes) => {
                let name = self.covers.store(bytes, &title)?;
                let previous = collection.set_cover(id, Some(name.clone())).map_err(ErrorKind::catalog)?;
                (Some(name), previous)
            },
            CoverChange::Clear => (None, collection.set_cover(id, None).map_err(ErrorKind::catalog)?),
        };
        if let Err(err) = self.save(&collection) {
            if let Some(name) = &stored {
                self.covers.remove(name);
            }
            return Err(err);
        }
        if let Some(previous) = previous {
            self.release_cover(&collection, &previous);
        }
        info!(%id, "Updated book");
        Self::cloned(&collection, id)
    }

    /// Deletes a book and then its cover, returning the deleted record.
    #[instrument(skip(self))]
    pub fn delete(&self, id: BookId) -> Result<Book> {
        let mut collection = self.load()?;
        let book = collection.delete(id).map_err(ErrorKind::catalog)?;
        self.save(&collection)?;
        if let Some(name) = &book.cover {
            self.release_cover(&collection, name);
        }
        info!(%id, title = %book.title, "Deleted book");
        Ok(book)
    }

    /// The cover image of a book. `None` means there is nothing to show, either
    /// because the book has no cover or because the file has gone missing.
    pub fn cover(&self, id: BookId) -> Result<Option<Vec<u8>>> {
        let collection = self.load()?;
        let book = collection
            .get(id)
            .ok_or_raise(|| ErrorKind::Catalog(CatalogErrorKind::NotFound(id)))?;
        match &book.cover {
            Some(name) => self.covers.retrieve(name),
            None => Ok(None),
        }
    }

    /// Removes every stored cover no book refers to, returning their names.
    #[instrument(skip(self))]
    pub fn prune_covers(&self) -> Result<Vec<String>> {
        let collection = self.load()?;
        let removed: Vec<String> =
            self.covers.orphans(&collection)?.into_iter().filter(|name| self.covers.remove(name)).collect();
        info!(count = removed.len(), "Pruned orphaned covers");
        Ok(removed)
    }

    fn release_cover(&self, collection: &Collection, name: &str) {
        if collection.references_cover(name) {
            debug!(%name, "Cover still referenced by another book, keeping it");
            return;
        }
        self.covers.remove(name);
    }

    fn cloned(collection: &Collection, id: BookId) -> Result<Book> {
        collection.get(id).cloned().ok_or_raise(|| ErrorKind::Catalog(CatalogErrorKind::NotFound(id)))
    }
}
