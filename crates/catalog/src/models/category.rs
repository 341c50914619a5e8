use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use super::sanitize;
use crate::error::{Error, ErrorKind};

/// Subject category of a book. The set is fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Category {
    #[default]
    Literature,
    History,
    Philosophy,
    Science,
    Religion,
    Politics,
    Economics,
    SelfDevelopment,
    Biography,
    Other,
}
impl Category {
    /// Every category, in the order they are offered to the user.
    pub const ALL: [Category; 10] = [
        Self::Literature,
        Self::History,
        Self::Philosophy,
        Self::Science,
        Self::Religion,
        Self::Politics,
        Self::Economics,
        Self::SelfDevelopment,
        Self::Biography,
        Self::Other,
    ];

    /// Returns the label written to the record table.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Literature => "أدب",
            Self::History => "تاريخ",
            Self::Philosophy => "فلسفة",
            Self::Science => "علوم",
            Self::Religion => "دين",
            Self::Politics => "سياسة",
            Self::Economics => "اقتصاد",
            Self::SelfDevelopment => "تنمية بشرية",
            Self::Biography => "سيرة ذاتية",
            Self::Other => "أخرى",
        }
    }

    /// Returns the English name of the category.
    pub fn as_english_str(&self) -> &'static str {
        match self {
            Self::Literature => "Literature",
            Self::History => "History",
            Self::Philosophy => "Philosophy",
            Self::Science => "Science",
            Self::Religion => "Religion",
            Self::Politics => "Politics",
            Self::Economics => "Economics",
            Self::SelfDevelopment => "Self Development",
            Self::Biography => "Biography",
            Self::Other => "Other",
        }
    }
}
impl FromStr for Category {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(category) = Self::ALL.into_iter().find(|c| c.as_str() == trimmed) {
            return Ok(category);
        }
        let sanitized = sanitize(s);
        Ok(match sanitized.as_str() {
            "literature" => Self::Literature,
            "history" => Self::History,
            "philosophy" => Self::Philosophy,
            "science" | "sciences" => Self::Science,
            "religion" => Self::Religion,
            "politics" => Self::Politics,
            "economics" => Self::Economics,
            "selfdevelopment" | "selfhelp" => Self::SelfDevelopment,
            "biography" | "autobiography" => Self::Biography,
            "other" => Self::Other,
            _ => exn::bail!(ErrorKind::InvalidData("category")),
        })
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_labels_round_trip() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>().unwrap(), category);
            assert_eq!(category.as_english_str().parse::<Category>().unwrap(), category);
        }
    }

    #[rstest]
    #[case("أدب", Category::Literature)]
    #[case(" تنمية بشرية ", Category::SelfDevelopment)]
    #[case("self-help", Category::SelfDevelopment)]
    #[case("SCIENCE", Category::Science)]
    #[case("other", Category::Other)]
    fn test_parse(#[case] input: &str, #[case] expected: Category) {
        assert_eq!(input.parse::<Category>().unwrap(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("رواية")]
    #[case("fiction")]
    fn test_parse_unknown(#[case] input: &str) {
        let err = input.parse::<Category>().unwrap_err();
        assert_eq!(*err, ErrorKind::InvalidData("category"));
    }
}
