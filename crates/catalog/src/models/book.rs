use std::fmt::{Display, Formatter, Result as FmtResult};

use super::{Category, PageCount, Rating, Status};
use crate::error::{Error, ErrorKind};
use time::Date;

/// Stable identifier of a book, assigned once when the book is added.
///
/// Titles are not unique, so books are always selected by identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BookId(u64);
impl BookId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}
impl Display for BookId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.0)
    }
}

/// One tracked book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    pub id: BookId,
    /// Never empty
    pub title: String,
    /// Never empty
    pub author: String,
    pub category: Category,
    pub published: Date,
    pub pages: PageCount,
    pub status: Status,
    pub rating: Rating,
    /// Free text, possibly empty
    pub notes: String,
    /// Day the book was added to the shelf; never changes afterwards
    pub added: Date,
    /// Filename of the cover image in the cover store
    pub cover: Option<String>,
}
impl Book {
    pub(crate) fn new(id: BookId, fields: BookFields, added: Date) -> Self {
        let BookFields { title, author, category, published, pages, status, rating, notes } = fields;
        Self { id, title, author, category, published, pages, status, rating, notes, added, cover: None }
    }

    /// Replaces every user-editable field. Identifier, date added and cover
    /// stay as they are.
    pub(crate) fn apply(&mut self, fields: BookFields) {
        let BookFields { title, author, category, published, pages, status, rating, notes } = fields;
        self.title = title;
        self.author = author;
        self.category = category;
        self.published = published;
        self.pages = pages;
        self.status = status;
        self.rating = rating;
        self.notes = notes;
    }

    /// The user-editable fields of this book, e.g. to prefill an edit form.
    pub fn fields(&self) -> BookFields {
        BookFields {
            title: self.title.clone(),
            author: self.author.clone(),
            category: self.category,
            published: self.published,
            pages: self.pages,
            status: self.status,
            rating: self.rating,
            notes: self.notes.clone(),
        }
    }
}

/// The fields a user fills in when adding or editing a book.
///
/// Defaults follow the entry form: literature, 100 pages, already read,
/// three stars, no notes.
///
/// ```
/// use shelf_catalog::{BookFields, Category, Rating, Status};
/// use time::macros::date;
///
/// let fields = BookFields::new("Dune", "Frank Herbert", date!(1965 - 08 - 01))
///     .with_category(Category::Literature)
///     .with_status(Status::Reading)
///     .with_rating(Rating::new(5).unwrap());
/// assert!(fields.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookFields {
    pub title: String,
    pub author: String,
    pub category: Category,
    pub published: Date,
    pub pages: PageCount,
    pub status: Status,
    pub rating: Rating,
    pub notes: String,
}
impl BookFields {
    pub fn new(title: impl Into<String>, author: impl Into<String>, published: Date) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            category: Category::default(),
            published,
            pages: PageCount::default(),
            status: Status::default(),
            rating: Rating::default(),
            notes: String::new(),
        }
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    pub fn with_pages(mut self, pages: PageCount) -> Self {
        self.pages = pages;
        self
    }

    pub fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    pub fn with_rating(mut self, rating: Rating) -> Self {
        self.rating = rating;
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    /// Checks that title and author are present.
    ///
    /// Returns [`Validation`](ErrorKind::Validation) naming the first empty
    /// field. Whitespace-only counts as empty.
    pub fn validate(&self) -> Result<(), Error> {
        if self.title.trim().is_empty() {
            exn::bail!(ErrorKind::Validation("title"));
        }
        if self.author.trim().is_empty() {
            exn::bail!(ErrorKind::Validation("author"));
        }
        Ok(())
    }

    /// Validates, then trims surrounding whitespace from title and author.
    pub(crate) fn validated(mut self) -> Result<Self, Error> {
        self.validate()?;
        self.title = self.title.trim().to_string();
        self.author = self.author.trim().to_string();
        Ok(self)
    }
}
