mod book;
mod category;
mod pages;
mod rating;
mod status;

pub use self::book::{Book, BookFields, BookId};
pub use self::category::Category;
pub use self::pages::PageCount;
pub use self::rating::Rating;
pub use self::status::Status;

/// Normalizes free-form labels for alias matching.
fn sanitize(s: impl AsRef<str>) -> String {
    s.as_ref().trim().to_lowercase().replace(['/', '-', '_', ' '], "")
}
