use crate::models::{Book, Category, Status};

/// Criteria for a filtered view of a [`Collection`](crate::Collection).
///
/// Status, category and search compose with AND. An empty status or category
/// selection, or an empty search term, places no restriction; the default
/// filter matches every book.
///
/// ```
/// use shelf_catalog::{Filter, Status};
///
/// let filter = Filter::new().with_status(Status::Reading).with_search("علم");
/// assert!(!filter.is_empty());
/// assert!(Filter::default().is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    statuses: Vec<Status>,
    categories: Vec<Category>,
    /// Stored lowercased
    search: String,
}
impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_status(mut self, status: Status) -> Self {
        if !self.statuses.contains(&status) {
            self.statuses.push(status);
        }
        self
    }

    pub fn with_statuses(self, statuses: impl IntoIterator<Item = Status>) -> Self {
        statuses.into_iter().fold(self, Self::with_status)
    }

    pub fn with_category(mut self, category: Category) -> Self {
        if !self.categories.contains(&category) {
            self.categories.push(category);
        }
        self
    }

    pub fn with_categories(self, categories: impl IntoIterator<Item = Category>) -> Self {
        categories.into_iter().fold(self, Self::with_category)
    }

    /// Case-insensitive substring to look for in title or author.
    pub fn with_search(mut self, term: impl AsRef<str>) -> Self {
        self.search = term.as_ref().to_lowercase();
        self
    }

    /// Whether this filter lets every book through.
    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty() && self.categories.is_empty() && self.search.is_empty()
    }

    pub fn matches(&self, book: &Book) -> bool {
        if !self.statuses.is_empty() && !self.statuses.contains(&book.status) {
            return false;
        }
        if !self.categories.is_empty() && !self.categories.contains(&book.category) {
            return false;
        }
        self.search.is_empty()
            || book.title.to_lowercase().contains(&self.search)
            || book.author.to_lowercase().contains(&self.search)
    }
}
