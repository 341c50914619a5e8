//! CSV shape of the record table.
//!
//! Column names are the ones the table has always used, so tables written by
//! earlier versions keep loading. The `id` column came later and may be
//! missing; such rows get identifiers assigned in row order.

use crate::collection::Collection;
use crate::error::{Error, ErrorKind, Result};
use crate::models::{Book, BookId};
use exn::{OptionExt, ResultExt};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io::{Read, Write};
use time::Date;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

const COLUMN_TITLE: &str = "عنوان";
const COLUMN_AUTHOR: &str = "مؤلف";
const COLUMN_CATEGORY: &str = "تصنيف";
const COLUMN_PUBLISHED: &str = "تاريخ النشر";
const COLUMN_PAGES: &str = "عدد الصفحات";
const COLUMN_STATUS: &str = "الحالة";
const COLUMN_RATING: &str = "التقييم";
const COLUMN_NOTES: &str = "ملاحظات";
const COLUMN_ADDED: &str = "تاريخ الإضافة";
const COLUMN_COVER: &str = "صورة الغلاف";
const COLUMN_ID: &str = "id";

/// Header row, in the order columns are written. Must match [`BookRow`].
pub(crate) const HEADERS: [&str; 11] = [
    COLUMN_TITLE,
    COLUMN_AUTHOR,
    COLUMN_CATEGORY,
    COLUMN_PUBLISHED,
    COLUMN_PAGES,
    COLUMN_STATUS,
    COLUMN_RATING,
    COLUMN_NOTES,
    COLUMN_ADDED,
    COLUMN_COVER,
    COLUMN_ID,
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct BookRow {
    #[serde(rename = "عنوان")]
    title: String,
    #[serde(rename = "مؤلف")]
    author: String,
    #[serde(rename = "تصنيف")]
    category: String,
    #[serde(rename = "تاريخ النشر")]
    published: String,
    #[serde(rename = "عدد الصفحات")]
    pages: i64,
    #[serde(rename = "الحالة")]
    status: String,
    #[serde(rename = "التقييم")]
    rating: i64,
    #[serde(rename = "ملاحظات", default)]
    notes: Option<String>,
    #[serde(rename = "تاريخ الإضافة")]
    added: String,
    #[serde(rename = "صورة الغلاف", default)]
    cover: Option<String>,
    #[serde(default)]
    id: Option<u64>,
}
impl From<&Book> for BookRow {
    fn from(book: &Book) -> Self {
        Self {
            title: book.title.clone(),
            author: book.author.clone(),
            category: book.category.to_string(),
            published: format_date(book.published),
            pages: i64::from(book.pages),
            status: book.status.to_string(),
            rating: i64::from(book.rating),
            notes: Some(book.notes.clone()),
            added: format_date(book.added),
            cover: book.cover.clone(),
            id: Some(book.id.get()),
        }
    }
}
impl BookRow {
    /// Converts into a typed [`Book`], using `fallback_id` when the row has
    /// no identifier of its own.
    fn into_book(self, fallback_id: BookId) -> std::result::Result<Book, Error> {
        let title = self.title.trim().to_string();
        let author = self.author.trim().to_string();
        if title.is_empty() {
            exn::bail!(ErrorKind::Validation("title"));
        }
        if author.is_empty() {
            exn::bail!(ErrorKind::Validation("author"));
        }
        Ok(Book {
            id: self.id.map(BookId::new).unwrap_or(fallback_id),
            title,
            author,
            category: self.category.parse()?,
            published: parse_date(&self.published, "publication date")?,
            pages: self.pages.try_into()?,
            status: self.status.parse()?,
            rating: self.rating.try_into()?,
            notes: self.notes.unwrap_or_default(),
            added: parse_date(&self.added, "date added")?,
            cover: self.cover.map(|c| c.trim().to_string()).filter(|c| !c.is_empty()),
        })
    }
}

fn format_date(date: Date) -> String {
    // The format only has numeric components, it cannot fail on a valid date.
    date.format(DATE_FORMAT).unwrap_or_default()
}

fn parse_date(value: &str, field: &'static str) -> std::result::Result<Date, Error> {
    Date::parse(value.trim(), DATE_FORMAT).or_raise(|| ErrorKind::InvalidData(field))
}

/// Reads a whole record table.
///
/// The header must name every column except `id`. Any row that fails to
/// convert makes the whole table [`Malformed`](ErrorKind::Malformed).
pub(crate) fn read_table(reader: impl Read) -> Result<Collection> {
    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);
    let headers = reader.headers().or_raise(|| ErrorKind::Malformed { line: 1 })?.clone();
    let present: HashSet<&str> = headers.iter().map(str::trim).collect();
    if HEADERS.iter().filter(|h| **h != COLUMN_ID).any(|h| !present.contains(h)) {
        exn::bail!(ErrorKind::Malformed { line: 1 });
    }

    let mut rows = Vec::new();
    let mut record = csv::StringRecord::new();
    loop {
        let line = reader.position().line();
        let more = reader.read_record(&mut record).or_raise(|| ErrorKind::Malformed { line })?;
        if !more {
            break;
        }
        let line = record.position().map(|p| p.line()).unwrap_or(line);
        let row: BookRow = record.deserialize(Some(&headers)).or_raise(|| ErrorKind::Malformed { line })?;
        rows.push((line, row));
    }

    // Rows from before the `id` column existed are numbered after the
    // highest identifier already present.
    let mut next_id = match rows.iter().filter_map(|(_, row)| row.id).max() {
        Some(max) => max.checked_add(1),
        None => Some(1),
    };
    let mut seen = HashSet::new();
    let mut books = Vec::with_capacity(rows.len());
    for (line, row) in rows {
        let fallback = match row.id {
            Some(id) => id,
            None => {
                let id = next_id.ok_or_raise(|| ErrorKind::Malformed { line })?;
                next_id = id.checked_add(1);
                id
            },
        };
        let book = row.into_book(BookId::new(fallback)).or_raise(|| ErrorKind::Malformed { line })?;
        if !seen.insert(book.id) {
            exn::bail!(ErrorKind::Malformed { line });
        }
        books.push(book);
    }
    Ok(Collection::from_books(books))
}

/// Writes a whole record table, header first, even when there are no books.
pub(crate) fn write_table(writer: impl Write, collection: &Collection) -> Result<()> {
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
    writer.write_record(HEADERS).or_raise(|| ErrorKind::Io)?;
    for book in collection.iter() {
        writer.serialize(BookRow::from(book)).or_raise(|| ErrorKind::Io)?;
    }
    writer.flush().or_raise(|| ErrorKind::Io)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BookFields, Category, PageCount, Rating, Status};
    use time::macros::date;

    const LEGACY_TABLE: &str = "\
عنوان,مؤلف,تصنيف,تاريخ النشر,عدد الصفحات,الحالة,التقييم,ملاحظات,تاريخ الإضافة,صورة الغلاف
كتاب1,مؤلف1,أدب,2020-05-01,120,قيد القراءة,4,,2024-10-19,
تاريخ العلم,أحمد علمي,علوم,1999-12-31,300,تمت القراءة,5,\"ممتاز, جدا\",2024-10-18,تاريخ_العلم_20241018093000.jpg
";

    fn sample() -> Collection {
        let mut collection = Collection::default();
        let fields = BookFields::new("كتاب1", "مؤلف1", date!(2020 - 05 - 01))
            .with_category(Category::Literature)
            .with_pages(PageCount::new(120).unwrap())
            .with_status(Status::Reading)
            .with_rating(Rating::new(4).unwrap());
        collection.add(fields, date!(2024 - 10 - 19)).unwrap();
        let fields = BookFields::new("تاريخ العلم", "أحمد علمي", date!(1999 - 12 - 31))
            .with_category(Category::Science)
            .with_notes("ممتاز, جدا\nسطر ثان \"مقتبس\"");
        let id = collection.add(fields, date!(2024 - 10 - 18)).unwrap().id;
        collection.set_cover(id, Some("cover.jpg".to_string())).unwrap();
        collection
    }

    fn write_to_string(collection: &Collection) -> String {
        let mut buffer = Vec::new();
        write_table(&mut buffer, collection).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_headers_match_row_fields() {
        let book = sample().iter().next().cloned().unwrap();
        let mut buffer = Vec::new();
        {
            let mut writer = csv::WriterBuilder::new().has_headers(true).from_writer(&mut buffer);
            writer.serialize(BookRow::from(&book)).unwrap();
            writer.flush().unwrap();
        }
        let written = String::from_utf8(buffer).unwrap();
        assert_eq!(written.lines().next().unwrap(), HEADERS.join(","));
    }

    #[test]
    fn test_round_trip() {
        let collection = sample();
        let text = write_to_string(&collection);
        let loaded = read_table(text.as_bytes()).unwrap();
        assert_eq!(loaded, collection);
    }

    #[test]
    fn test_empty_collection_writes_header() {
        let text = write_to_string(&Collection::default());
        assert_eq!(text.trim_end(), HEADERS.join(","));
        assert!(read_table(text.as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn test_values_are_written_as_labels() {
        let text = write_to_string(&sample());
        let first = text.lines().nth(1).unwrap();
        assert_eq!(first, "كتاب1,مؤلف1,أدب,2020-05-01,120,قيد القراءة,4,,2024-10-19,,1");
    }

    #[test]
    fn test_legacy_table_without_ids() {
        let collection = read_table(LEGACY_TABLE.as_bytes()).unwrap();
        let books: Vec<_> = collection.iter().collect();
        assert_eq!(books.len(), 2);
        assert_eq!(books[0].id, BookId::new(1));
        assert_eq!(books[0].cover, None);
        assert_eq!(books[0].notes, "");
        assert_eq!(books[1].id, BookId::new(2));
        assert_eq!(books[1].notes, "ممتاز, جدا");
        assert_eq!(books[1].cover.as_deref(), Some("تاريخ_العلم_20241018093000.jpg"));
        assert_eq!(books[1].published, date!(1999 - 12 - 31));
    }

    /// A table with the current header and one row per identifier, where
    /// `None` leaves the `id` cell empty.
    fn table_with_ids(ids: &[Option<u64>]) -> String {
        let mut text = HEADERS.join(",");
        text.push('\n');
        for id in ids {
            let id = id.map(|id| id.to_string()).unwrap_or_default();
            text.push_str(&format!("a,b,أدب,2020-01-01,10,قيد القراءة,3,,2024-01-01,,{id}\n"));
        }
        text
    }

    #[test]
    fn test_mixed_ids_never_collide() {
        let text = table_with_ids(&[Some(5), None]);
        let collection = read_table(text.as_bytes()).unwrap();
        let ids: Vec<_> = collection.iter().map(|b| b.id.get()).collect();
        assert_eq!(ids, vec![5, 6]);
    }

    #[test]
    fn test_duplicate_ids_are_malformed() {
        let text = table_with_ids(&[Some(5), Some(5)]);
        let err = read_table(text.as_bytes()).unwrap_err();
        assert_eq!(*err, ErrorKind::Malformed { line: 3 });
    }

    #[test]
    fn test_highest_id_loads() {
        let text = table_with_ids(&[Some(u64::MAX)]);
        let collection = read_table(text.as_bytes()).unwrap();
        assert_eq!(collection.get(BookId::new(u64::MAX)).unwrap().title, "a");
    }

    #[test]
    fn test_no_id_left_for_legacy_row_is_malformed() {
        let text = table_with_ids(&[Some(u64::MAX), None]);
        let err = read_table(text.as_bytes()).unwrap_err();
        assert_eq!(*err, ErrorKind::Malformed { line: 3 });
    }

    #[test]
    fn test_missing_column_is_malformed() {
        let text = "عنوان,مؤلف\nكتاب1,مؤلف1\n";
        let err = read_table(text.as_bytes()).unwrap_err();
        assert_eq!(*err, ErrorKind::Malformed { line: 1 });
    }

    #[test]
    fn test_empty_file_is_malformed() {
        let err = read_table(&b""[..]).unwrap_err();
        assert_eq!(*err, ErrorKind::Malformed { line: 1 });
    }

    #[test]
    fn test_bad_values_are_malformed() {
        let bad_rating = LEGACY_TABLE.replacen(",4,", ",9,", 1);
        let err = read_table(bad_rating.as_bytes()).unwrap_err();
        assert_eq!(*err, ErrorKind::Malformed { line: 2 });

        let bad_status = LEGACY_TABLE.replacen("قيد القراءة", "مهجور", 1);
        assert!(read_table(bad_status.as_bytes()).is_err());

        let bad_date = LEGACY_TABLE.replacen("2020-05-01", "01/05/2020", 1);
        assert!(read_table(bad_date.as_bytes()).is_err());

        let empty_title = LEGACY_TABLE.replacen("كتاب1", "", 1);
        assert!(read_table(empty_title.as_bytes()).is_err());
    }
}
