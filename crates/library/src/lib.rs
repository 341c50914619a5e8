//! Book shelf operations.
//!
//! A [`Shelf`] ties the record table from [`shelf_catalog`] to the cover
//! images held by a [`shelf_storage`] backend. Every operation loads the whole
//! table, changes it, saves it back, and then tidies up covers that are no
//! longer referenced.

mod covers;
pub mod error;
mod shelf;

pub use crate::covers::Covers;
pub use crate::shelf::{CoverChange, Shelf};
use time::OffsetDateTime;

/// Current time in the local timezone, or UTC if the local offset cannot be
/// determined.
pub(crate) fn now() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}
