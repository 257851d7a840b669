use serde::{Deserialize, Serialize};
use std::fmt;

/// Spending category attached to a receipt by the merchant catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Tag {
    Groceries,
    Dining,
    Bento,
    Household,
    Alcohol,
    Clothes,
    Other(String),
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tag::Groceries => write!(f, "groceries"),
            Tag::Dining => write!(f, "dining"),
            Tag::Bento => write!(f, "bento"),
            Tag::Household => write!(f, "household"),
            Tag::Alcohol => write!(f, "alcohol"),
            Tag::Clothes => write!(f, "clothes"),
            Tag::Other(s) => write!(f, "{s}"),
        }
    }
}

impl From<&str> for Tag {
    fn from(s: &str) -> Self {
        match s {
            "groceries" => Tag::Groceries,
            "dining" => Tag::Dining,
            "bento" => Tag::Bento,
            "household" => Tag::Household,
            "alcohol" => Tag::Alcohol,
            "clothes" => Tag::Clothes,
            other => Tag::Other(other.to_string()),
        }
    }
}

impl From<String> for Tag {
    fn from(s: String) -> Self {
        Tag::from(s.as_str())
    }
}

impl From<Tag> for String {
    fn from(tag: Tag) -> Self {
        tag.to_string()
    }
}

/// Structured fields recovered from one receipt.
///
/// Unresolved fields keep their empty values: `""` for name and date, no tags and a
/// total of `0`. A zero total is therefore indistinguishable from a total that could
/// not be found.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReceiptInfo {
    pub name: String,
    /// `YYYY-M-D` without zero padding, e.g. `2023-4-5`.
    pub date: String,
    /// Discovery order, duplicates kept.
    pub tags: Vec<Tag>,
    pub total: i64,
}
