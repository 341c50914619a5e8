use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use super::sanitize;
use crate::error::{Error, ErrorKind};

/// Reading status of a book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Status {
    /// Finished reading.
    #[default]
    Read,
    /// Currently being read.
    Reading,
    /// Not started yet.
    Unread,
}
impl Status {
    pub const ALL: [Status; 3] = [Self::Read, Self::Reading, Self::Unread];

    /// Returns the label written to the record table.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Read => "تمت القراءة",
            Self::Reading => "قيد القراءة",
            Self::Unread => "لم تتم القراءة بعد",
        }
    }

    /// Returns the English name of the status.
    pub fn as_english_str(&self) -> &'static str {
        match self {
            Self::Read => "Read",
            Self::Reading => "Reading",
            Self::Unread => "Unread",
        }
    }
}
impl FromStr for Status {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(status) = Self::ALL.into_iter().find(|st| st.as_str() == trimmed) {
            return Ok(status);
        }
        Ok(match sanitize(s).as_str() {
            "read" | "finished" | "done" => Self::Read,
            "reading" | "inprogress" => Self::Reading,
            "unread" | "notstarted" | "toread" => Self::Unread,
            _ => exn::bail!(ErrorKind::InvalidData("status")),
        })
    }
}

impl Display for Status {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}
