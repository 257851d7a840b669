use kaikei_core::Tag;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse catalog TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// A known merchant (or product) marker and what it implies about the receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerchantEntry {
    /// Substring searched for in each receipt line; case and script sensitive.
    pub key: String,
    /// Canonical merchant name. Product markers (a beer brand, say) carry only a tag.
    #[serde(default)]
    pub name: Option<String>,
    pub tag: Tag,
}

impl MerchantEntry {
    pub fn new(key: impl Into<String>, name: Option<&str>, tag: Tag) -> Self {
        Self { key: key.into(), name: name.map(str::to_string), tag }
    }
}

/// Everything one line matched, in catalog order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CatalogMatch<'a> {
    /// Name of the last matching entry that has one.
    pub name: Option<&'a str>,
    pub tags: Vec<&'a Tag>,
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default, rename = "merchant")]
    merchants: Vec<MerchantEntry>,
}

/// Ordered merchant table. Order is precedence: when several entries match the
/// same line, the later entry's name wins.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MerchantCatalog {
    entries: Vec<MerchantEntry>,
}

impl MerchantCatalog {
    pub fn new(entries: Vec<MerchantEntry>) -> Self {
        Self { entries }
    }

    /// Parse a catalog from `[[merchant]]` tables, keeping file order.
    ///
    /// ```toml
    /// [[merchant]]
    /// key = "セブン-イレブン"
    /// name = "Seven Eleven"
    /// tag = "groceries"
    /// ```
    pub fn from_toml(toml_content: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = toml::from_str(toml_content)?;
        Ok(Self::new(file.merchants))
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        Self::from_toml(&std::fs::read_to_string(path)?)
    }

    /// The stores this project was built around.
    pub fn builtin() -> Self {
        Self::new(vec![
            MerchantEntry::new("泰和", Some("Chinese Super"), Tag::Groceries),
            MerchantEntry::new("肉のハナマ", Some("Niku no Hanamasa"), Tag::Groceries),
            MerchantEntry::new("東武ストア", Some("Kasai New Super"), Tag::Groceries),
            MerchantEntry::new("smartwaon", Some("My Basket"), Tag::Groceries),
            MerchantEntry::new("セブン-イレブン", Some("Seven Eleven"), Tag::Groceries),
            // Lawson is recognized by its receipt stamp line.
            MerchantEntry::new("上記正に領収いたしました", Some("Lawson"), Tag::Groceries),
            MerchantEntry::new("黒ラベル", None, Tag::Alcohol),
            MerchantEntry::new("クロラベル", None, Tag::Alcohol),
            MerchantEntry::new("ドミノピザ", Some("Domino's"), Tag::Dining),
            MerchantEntry::new("Hotto", Some("Hotto Motto"), Tag::Bento),
            MerchantEntry::new("welcia", Some("Welcia"), Tag::Groceries),
            MerchantEntry::new("貴族", Some("Torikizoku"), Tag::Dining),
            MerchantEntry::new("ロフト", Some("Loft"), Tag::Household),
            MerchantEntry::new("UNIQLO", Some("Uniqlo"), Tag::Household),
            MerchantEntry::new("ヨーカドー", Some("Ito Yokado"), Tag::Groceries),
        ])
    }

    pub fn entries(&self) -> &[MerchantEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Match every entry against `line`. Tags are collected without de-duplication.
    pub fn match_line(&self, line: &str) -> CatalogMatch<'_> {
        self.entries
            .iter()
            .filter(|e| line.contains(e.key.as_str()))
            .fold(CatalogMatch::default(), |mut acc, e| {
                if let Some(name) = e.name.as_deref() {
                    acc.name = Some(name);
                }
                acc.tags.push(&e.tag);
                acc
            })
    }
}
