//! Book records for the shelf.
//!
//! The record table is a single CSV file holding every book. It is the source
//! of truth: each operation loads the whole table into a [`Collection`],
//! changes it in memory, and writes the whole table back through a
//! [`RecordStore`].
//!
//! # Architecture
//! - **Models**: [`Book`] and the value types it is made of. Invalid ratings,
//!   page counts and labels cannot be constructed.
//! - **Rows**: the CSV shape of a book. Conversion to and from the typed
//!   model happens in one place, and a row that fails conversion makes the
//!   whole table malformed.
//! - **Collection**: ordered, in-memory CRUD over books, selected by
//!   [`BookId`].

mod collection;
pub mod error;
mod filter;
pub mod models;
mod rows;
mod store;

pub use crate::collection::{Collection, Stats};
pub use crate::filter::Filter;
pub use crate::models::{Book, BookFields, BookId, Category, PageCount, Rating, Status};
pub use crate::store::RecordStore;
