use std::fmt::{Display, Formatter, Result as FmtResult};
use std::num::NonZeroU32;

use crate::error::{Error, ErrorKind};
use exn::{OptionExt, ResultExt};

/// Number of pages in a book. Always at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PageCount(NonZeroU32);
impl PageCount {
    /// Returns [`InvalidData`](ErrorKind::InvalidData) for zero.
    pub fn new(pages: u32) -> Result<Self, Error> {
        Ok(Self(NonZeroU32::new(pages).ok_or_raise(|| ErrorKind::InvalidData("page count"))?))
    }

    pub fn get(&self) -> u32 {
        self.0.get()
    }
}
impl Default for PageCount {
    fn default() -> Self {
        Self(NonZeroU32::new(100).unwrap_or(NonZeroU32::MIN))
    }
}
impl TryFrom<i64> for PageCount {
    type Error = Error;
    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(u32::try_from(value).or_raise(|| ErrorKind::InvalidData("page count"))?)
    }
}
impl From<PageCount> for i64 {
    fn from(pages: PageCount) -> Self {
        i64::from(pages.get())
    }
}

impl Display for PageCount {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds() {
        assert_eq!(PageCount::new(1).unwrap().get(), 1);
        assert_eq!(*PageCount::new(0).unwrap_err(), ErrorKind::InvalidData("page count"));
        assert!(PageCount::try_from(-120).is_err());
        assert_eq!(i64::from(PageCount::try_from(120).unwrap()), 120);
        assert_eq!(PageCount::default().get(), 100);
    }
}
