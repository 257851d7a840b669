use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid extractor config: {0}")]
    Invalid(String),
}

/// Tunables for receipt extraction. Every field has a default, so a TOML file only
/// needs to name what it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Label fragment that marks the total line (`合` as in `合計`).
    pub total_keyword: String,
    /// Row window factor: a fragment belongs to the anchor's row when its coordinate
    /// lies strictly between `height * row_tolerance` and `height / row_tolerance`.
    pub row_tolerance: f64,
    /// A vertical row with this many members or more is rescanned horizontally.
    pub row_overflow_limit: usize,
    /// Two-digit years below the pivot land in 20xx, the rest in 19xx.
    pub two_digit_year_pivot: u32,
    /// Abort aggregation on a date-shaped line that is not a real date instead of
    /// skipping it.
    pub strict_dates: bool,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            total_keyword: "合".to_string(),
            row_tolerance: 0.98,
            row_overflow_limit: 5,
            two_digit_year_pivot: 69,
            strict_dates: false,
        }
    }
}

impl ExtractorConfig {
    pub fn from_toml(toml_content: &str) -> Result<Self, ConfigError> {
        let config: ExtractorConfig = toml::from_str(toml_content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::from_toml(&std::fs::read_to_string(path)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.total_keyword.is_empty() {
            return Err(ConfigError::Invalid("total_keyword must not be empty".into()));
        }
        if !(self.row_tolerance > 0.0 && self.row_tolerance <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "row_tolerance must be in (0, 1], got {}",
                self.row_tolerance
            )));
        }
        if self.row_overflow_limit == 0 {
            return Err(ConfigError::Invalid("row_overflow_limit must be at least 1".into()));
        }
        if self.two_digit_year_pivot > 100 {
            return Err(ConfigError::Invalid(format!(
                "two_digit_year_pivot must be at most 100, got {}",
                self.two_digit_year_pivot
            )));
        }
        Ok(())
    }
}
