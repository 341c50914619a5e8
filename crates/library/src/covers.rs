//! Cover image assets.
//!
//! Covers live flat in a single directory of a [`StorageBackend`]. Each file is
//! named after the book it was uploaded for plus the second it was stored,
//! e.g. `تاريخ_العلم_20241018093000.jpg`, and always holds JPEG data no
//! matter what format was uploaded.
//!
//! [`StorageBackend`]: shelf_storage::StorageBackend

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use image::{DynamicImage, ImageFormat};
use shelf_catalog::Collection;
use shelf_storage::error::ErrorKind as StorageErrorKind;
use shelf_storage::{BackendHandle, validate_filename};
use std::io::Cursor;
use std::path::Path;
use time::OffsetDateTime;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use tracing::{debug, instrument, warn};

const TIMESTAMP_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year][month][day][hour][minute][second]");
const EXTENSION: &str = "jpg";
/// Used when nothing of the title survives sanitizing.
const FALLBACK_STEM: &str = "cover";

/// Stores, retrieves and removes cover images.
#[derive(Clone)]
pub struct Covers {
    backend: BackendHandle,
}

impl Covers {
    pub fn new(backend: BackendHandle) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &BackendHandle {
        &self.backend
    }

    /// Stores an uploaded cover for the book titled `title_hint` and returns
    /// the generated filename. Recording it on the book is up to the caller.
    pub fn store(&self, bytes: &[u8], title_hint: &str) -> Result<String> {
        self.store_at(bytes, title_hint, crate::now())
    }

    /// Same as [`store`](Self::store) with an explicit timestamp.
    ///
    /// # Errors
    /// - [`InvalidImage`](ErrorKind::InvalidImage) if the bytes cannot be
    ///   decoded; nothing is written.
    /// - [`CoverExists`](ErrorKind::CoverExists) if a cover for the same title
    ///   was already stored within the same second. The existing file is left
    ///   untouched.
    #[instrument(skip(self, bytes), fields(backend = self.backend.name(), bytes = bytes.len()))]
    pub fn store_at(&self, bytes: &[u8], title_hint: &str, timestamp: OffsetDateTime) -> Result<String> {
        let name = cover_name(title_hint, timestamp);
        let jpeg = normalize(bytes)?;
        match self.backend.create(Path::new(&name), &jpeg) {
            Ok(()) => {},
            Err(e) if matches!(&*e, StorageErrorKind::AlreadyExists(_)) => {
                return Err(e).or_raise(|| ErrorKind::CoverExists(name.clone()));
            },
            Err(e) => return Err(e).or_raise(|| ErrorKind::Storage),
        }
        debug!(%name, "Stored cover");
        Ok(name)
    }

    /// Raw bytes of a stored cover.
    ///
    /// A missing file, or a name that could never have come from the cover
    /// store, is `None` so the caller can render a placeholder.
    pub fn retrieve(&self, name: &str) -> Result<Option<Vec<u8>>> {
        let Ok(path) = validate_filename(name) else {
            debug!(%name, "Not a cover filename");
            return Ok(None);
        };
        match self.backend.read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.is_not_found() => {
                debug!(%name, "Cover is missing");
                Ok(None)
            },
            Err(e) => Err(e).or_raise(|| ErrorKind::Storage),
        }
    }

    /// Deletes a stored cover, best-effort.
    ///
    /// Never fails: problems are logged and reported as `false`. Returns
    /// `true` only when a file was actually removed.
    pub fn remove(&self, name: &str) -> bool {
        let Ok(path) = validate_filename(name) else {
            warn!(%name, "Refusing to remove something that is not a cover filename");
            return false;
        };
        match self.backend.delete(&path) {
            Ok(()) => {
                debug!(%name, "Removed cover");
                true
            },
            Err(e) if e.is_not_found() => {
                debug!(%name, "Cover was already gone");
                false
            },
            Err(e) => {
                let kind: &StorageErrorKind = &e;
                warn!(%name, error = %kind, "Could not remove cover");
                false
            },
        }
    }

    /// Stored covers that no book in `collection` refers to.
    ///
    /// Only files named like generated covers are considered, anything else
    /// sharing the directory is never reported.
    pub fn orphans(&self, collection: &Collection) -> Result<Vec<String>> {
        let files = self.backend.list().or_raise(|| ErrorKind::Storage)?;
        Ok(files
            .iter()
            .filter_map(|file| file.file_name())
            .filter(|name| is_cover_name(name) && !collection.references_cover(name))
            .map(str::to_string)
            .collect())
    }
}

/// Builds `<sanitized title>_<YYYYMMDDHHMMSS>.jpg`.
fn cover_name(title_hint: &str, timestamp: OffsetDateTime) -> String {
    // Only numeric components, so formatting cannot fail.
    let stamp = timestamp.format(TIMESTAMP_FORMAT).unwrap_or_default();
    format!("{}_{stamp}.{EXTENSION}", sanitize(title_hint))
}

/// Whether `name` has the `<stem>_<YYYYMMDDHHMMSS>.jpg` shape of a generated
/// cover.
fn is_cover_name(name: &str) -> bool {
    let Some(stem) = name.strip_suffix(EXTENSION).and_then(|s| s.strip_suffix('.')) else {
        return false;
    };
    match stem.rsplit_once('_') {
        Some((title, stamp)) => {
            !title.is_empty() && stamp.len() == 14 && stamp.bytes().all(|b| b.is_ascii_digit())
        },
        None => false,
    }
}

/// Keeps letters, digits, spaces and underscores, then turns the spaces into
/// underscores.
fn sanitize(title_hint: &str) -> String {
    let kept: String = title_hint.chars().filter(|c| c.is_alphanumeric() || *c == ' ' || *c == '_').collect();
    let stem = kept.trim_end().replace(' ', "_");
    if stem.is_empty() { FALLBACK_STEM.to_string() } else { stem }
}

/// Decodes any supported image format and re-encodes it as JPEG.
fn normalize(bytes: &[u8]) -> Result<Vec<u8>> {
    let decoded = image::load_from_memory(bytes).or_raise(|| ErrorKind::InvalidImage)?;
    // JPEG has no alpha channel.
    let rgb = DynamicImage::ImageRgb8(decoded.to_rgb8());
    let mut encoded = Cursor::new(Vec::new());
    rgb.write_to(&mut encoded, ImageFormat::Jpeg).or_raise(|| ErrorKind::Encode)?;
    Ok(encoded.into_inner())
}
