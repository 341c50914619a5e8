use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use crate::error::{Error, ErrorKind};
use exn::ResultExt;

/// A rating from one to five stars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Rating(u8);
impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    /// Returns [`InvalidData`](ErrorKind::InvalidData) outside `1..=5`.
    pub fn new(stars: u8) -> Result<Self, Error> {
        if !(Self::MIN..=Self::MAX).contains(&stars) {
            exn::bail!(ErrorKind::InvalidData("rating"));
        }
        Ok(Self(stars))
    }

    pub fn get(&self) -> u8 {
        self.0
    }
}
impl Default for Rating {
    fn default() -> Self {
        Self(3)
    }
}
impl TryFrom<i64> for Rating {
    type Error = Error;
    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(u8::try_from(value).or_raise(|| ErrorKind::InvalidData("rating"))?)
    }
}
impl From<Rating> for i64 {
    fn from(rating: Rating) -> Self {
        i64::from(rating.0)
    }
}
impl FromStr for Rating {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.trim().parse::<u8>().or_raise(|| ErrorKind::InvalidData("rating"))?)
    }
}

impl Display for Rating {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1)]
    #[case(3)]
    #[case(5)]
    fn test_in_range(#[case] stars: i64) {
        assert_eq!(i64::from(Rating::try_from(stars).unwrap()), stars);
    }

    #[rstest]
    #[case(0)]
    #[case(6)]
    #[case(-1)]
    #[case(300)]
    fn test_out_of_range(#[case] stars: i64) {
        let err = Rating::try_from(stars).unwrap_err();
        assert_eq!(*err, ErrorKind::InvalidData("rating"));
    }

    #[test]
    fn test_parse() {
        assert_eq!(" 4 ".parse::<Rating>().unwrap().get(), 4);
        assert!("four".parse::<Rating>().is_err());
        assert_eq!(Rating::default().get(), 3);
    }
}
