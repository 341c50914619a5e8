use crate::error::{ErrorKind, Result};
use crate::filter::Filter;
use crate::models::{Book, BookFields, BookId, Category, Status};
use exn::OptionExt;
use time::Date;
use tracing::debug;

/// Every book on the shelf, in table order.
///
/// Books keep their position for as long as they exist: adding appends,
/// deleting closes the gap, and updating leaves the order alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collection {
    books: Vec<Book>,
    /// `None` once the highest identifier has been handed out.
    next_id: Option<u64>,
}
impl Default for Collection {
    fn default() -> Self {
        Self { books: Vec::new(), next_id: Some(1) }
    }
}

/// Reading progress across the whole collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    pub total: usize,
    pub read: usize,
    pub reading: usize,
    pub unread: usize,
}

impl Collection {
    /// Builds a collection from books that already have identifiers.
    /// Identifiers handed out later start after the highest one present.
    pub fn from_books(books: Vec<Book>) -> Self {
        let next_id = match books.iter().map(|b| b.id.get()).max() {
            Some(max) => max.checked_add(1),
            None => Some(1),
        };
        Self { books, next_id }
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Book> {
        self.books.iter()
    }

    pub fn get(&self, id: BookId) -> Option<&Book> {
        self.books.iter().find(|b| b.id == id)
    }

    /// Zero-based position of the book in table order.
    pub fn position(&self, id: BookId) -> Option<usize> {
        self.books.iter().position(|b| b.id == id)
    }

    /// First book with exactly this title. Titles are not unique.
    pub fn find_by_title(&self, title: &str) -> Option<&Book> {
        self.books.iter().find(|b| b.title == title)
    }

    /// Appends a new book stamped with `today` as its date added.
    ///
    /// Fails with [`Validation`](ErrorKind::Validation) if title or author is
    /// empty, and with [`IdsExhausted`](ErrorKind::IdsExhausted) once the
    /// highest identifier is taken, leaving the collection untouched.
    pub fn add(&mut self, fields: BookFields, today: Date) -> Result<&Book> {
        let fields = fields.validated()?;
        let id = self.next_id.ok_or_raise(|| ErrorKind::IdsExhausted)?;
        self.next_id = id.checked_add(1);
        let id = BookId::new(id);
        debug!(%id, title = %fields.title, "Adding book");
        self.books.push(Book::new(id, fields, today));
        let index = self.books.len() - 1;
        Ok(&self.books[index])
    }

    /// Replaces every editable field of a book in place.
    pub fn update(&mut self, id: BookId, fields: BookFields) -> Result<&Book> {
        let index = self.position(id).ok_or_raise(|| ErrorKind::NotFound(id))?;
        self.update_at(index, fields)
    }

    /// Same as [`update`](Self::update), addressed by position.
    pub fn update_at(&mut self, index: usize, fields: BookFields) -> Result<&Book> {
        let fields = fields.validated()?;
        let book = self.books.get_mut(index).ok_or_raise(|| ErrorKind::OutOfBounds(index))?;
        debug!(id = %book.id, "Updating book");
        book.apply(fields);
        Ok(&*book)
    }

    /// Removes a book and returns it, so the caller can clean up its cover.
    pub fn delete(&mut self, id: BookId) -> Result<Book> {
        let index = self.position(id).ok_or_raise(|| ErrorKind::NotFound(id))?;
        self.delete_at(index)
    }

    pub fn delete_at(&mut self, index: usize) -> Result<Book> {
        if index >= self.books.len() {
            exn::bail!(ErrorKind::OutOfBounds(index));
        }
        let book = self.books.remove(index);
        debug!(id = %book.id, "Deleted book");
        Ok(book)
    }

    /// Sets or clears the cover filename, returning the previous one.
    pub fn set_cover(&mut self, id: BookId, cover: Option<String>) -> Result<Option<String>> {
        let book = self.books.iter_mut().find(|b| b.id == id).ok_or_raise(|| ErrorKind::NotFound(id))?;
        Ok(std::mem::replace(&mut book.cover, cover))
    }

    /// Whether any book points at this cover filename.
    pub fn references_cover(&self, name: &str) -> bool {
        self.books.iter().any(|b| b.cover.as_deref() == Some(name))
    }

    /// Books the filter lets through, in table order.
    pub fn filter<'a>(&'a self, filter: &'a Filter) -> impl Iterator<Item = &'a Book> + 'a {
        self.books.iter().filter(move |b| filter.matches(b))
    }

    pub fn stats(&self) -> Stats {
        self.books.iter().fold(Stats { total: self.books.len(), ..Stats::default() }, |mut stats, book| {
            match book.status {
                Status::Read => stats.read += 1,
                Status::Reading => stats.reading += 1,
                Status::Unread => stats.unread += 1,
            }
            stats
        })
    }

    /// Distinct categories in use, in order of first appearance.
    pub fn categories(&self) -> Vec<Category> {
        let mut seen = Vec::new();
        for book in &self.books {
            if !seen.contains(&book.category) {
                seen.push(book.category);
            }
        }
        seen
    }
}

impl<'a> IntoIterator for &'a Collection {
    type Item = &'a Book;
    type IntoIter = std::slice::Iter<'a, Book>;
    fn into_iter(self) -> Self::IntoIter {
        self.books.iter()
    }
}
