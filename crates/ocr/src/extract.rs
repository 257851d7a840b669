use kaikei_core::{ReceiptInfo, TokenSequence};
use thiserror::Error;
use tracing::warn;

use crate::catalog::MerchantCatalog;
use crate::config::ExtractorConfig;
use crate::date::{format_receipt_date, DateParseError, DateParser};
use crate::row::RowFinder;
use crate::value::extract_integer;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error(transparent)]
    MalformedDate(#[from] DateParseError),
}

// ── Public extraction API ─────────────────────────────────────────────────────

/// Turns one receipt's OCR output into a [`ReceiptInfo`].
#[derive(Debug, Clone)]
pub struct Extractor {
    config: ExtractorConfig,
    rows: RowFinder,
    dates: DateParser,
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new(ExtractorConfig::default())
    }
}

impl Extractor {
    pub fn new(config: ExtractorConfig) -> Self {
        let rows = RowFinder::from_config(&config);
        let dates = DateParser::new(config.two_digit_year_pivot);
        Self { config, rows, dates }
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Walk every line of the full-text fragment for dates and catalog hits, then
    /// read the total off the keyword's row.
    ///
    /// Later lines overwrite the date and name found on earlier ones. A date-shaped
    /// line that is not a real date is skipped unless `strict_dates` is set.
    pub fn aggregate(
        &self,
        tokens: &TokenSequence,
        catalog: &MerchantCatalog,
    ) -> Result<ReceiptInfo, ExtractError> {
        let mut info = ReceiptInfo::default();

        for line in tokens.full_text().unwrap_or_default().lines() {
            match self.dates.parse(line) {
                Ok(Some(date)) => info.date = format_receipt_date(date),
                Ok(None) => {}
                Err(e) if self.config.strict_dates => return Err(e.into()),
                Err(e) => warn!(line, error = %e, "skipping malformed date"),
            }

            let hit = catalog.match_line(line);
            if let Some(name) = hit.name {
                info.name = name.to_string();
            }
            info.tags.extend(hit.tags.into_iter().cloned());
        }

        info.total = self.search_total(tokens);
        Ok(info)
    }

    /// Amount printed on the same row as the total keyword, `0` when not found.
    pub fn search_total(&self, tokens: &TokenSequence) -> i64 {
        extract_integer(&self.rows.find_row(tokens, &self.config.total_keyword))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use kaikei_core::{Tag, TextFragment};

    /// Builds a sequence whose fragment 0 joins the word descriptions line by line.
    fn receipt(lines: &[&str], words: &[(&str, i32, i32)]) -> TokenSequence {
        let mut fragments = vec![TextFragment::new(lines.join("\n"), 0, 0)];
        fragments.extend(words.iter().map(|&(d, x, y)| TextFragment::new(d, x, y)));
        TokenSequence::new(fragments)
    }

    fn seven_eleven() -> TokenSequence {
        receipt(
            &[
                "セブン-イレブン",
                "葛西駅前店",
                "2023年4月5日(水) 18:42",
                "サッポロ黒ラベル ¥248",
                "小計 ¥248",
                "合計 ¥268",
            ],
            &[
                ("セブン-イレブン", 120, 80),
                ("2023年4月5日(水)", 60, 240),
                ("サッポロ黒ラベル", 60, 420),
                ("¥248", 520, 421),
                ("小計", 60, 560),
                ("248", 540, 562),
                ("合計", 60, 640),
                ("268", 540, 642),
                ("円", 600, 641),
            ],
        )
    }

    #[test]
    fn aggregates_full_receipt() {
        let info = Extractor::default()
            .aggregate(&seven_eleven(), &MerchantCatalog::builtin())
            .unwrap();
        assert_eq!(
            info,
            ReceiptInfo {
                name: "Seven Eleven".into(),
                date: "2023-4-5".into(),
                tags: vec![Tag::Groceries, Tag::Alcohol],
                total: 268,
            }
        );
    }

    #[test]
    fn aggregate_is_idempotent() {
        let extractor = Extractor::default();
        let catalog = MerchantCatalog::builtin();
        let tokens = seven_eleven();
        assert_eq!(
            extractor.aggregate(&tokens, &catalog).unwrap(),
            extractor.aggregate(&tokens, &catalog).unwrap()
        );
    }

    #[test]
    fn no_matches_leave_fields_empty() {
        let tokens = receipt(
            &["ABC STORE", "合計 1,200"],
            &[("ABC", 10, 10), ("合計", 10, 300), ("1,200", 200, 302)],
        );
        let info = Extractor::default().aggregate(&tokens, &MerchantCatalog::builtin()).unwrap();
        assert_eq!(info.name, "");
        assert_eq!(info.date, "");
        assert!(info.tags.is_empty());
        assert_eq!(info.total, 1200);
    }

    #[test]
    fn last_date_line_wins() {
        let tokens = receipt(&["2023/4/5", "2023/4/6 再発行"], &[]);
        let info = Extractor::default().aggregate(&tokens, &MerchantCatalog::default()).unwrap();
        assert_eq!(info.date, "2023-4-6");
    }

    #[test]
    fn later_line_overwrites_name_and_tags_accumulate() {
        let tokens = receipt(&["ロフト", "イトーヨーカドー 葛西店"], &[]);
        let info = Extractor::default().aggregate(&tokens, &MerchantCatalog::builtin()).unwrap();
        assert_eq!(info.name, "Ito Yokado");
        assert_eq!(info.tags, vec![Tag::Household, Tag::Groceries]);
    }

    #[test]
    fn malformed_date_is_skipped_by_default() {
        let tokens = receipt(&["2023/4/5", "2023/13/40"], &[]);
        let info = Extractor::default().aggregate(&tokens, &MerchantCatalog::default()).unwrap();
        assert_eq!(info.date, "2023-4-5");
    }

    #[test]
    fn malformed_date_fails_in_strict_mode() {
        let config = ExtractorConfig { strict_dates: true, ..ExtractorConfig::default() };
        let tokens = receipt(&["2023/13/40"], &[]);
        let err = Extractor::new(config)
            .aggregate(&tokens, &MerchantCatalog::default())
            .unwrap_err();
        assert!(matches!(err, ExtractError::MalformedDate(_)));
    }

    #[test]
    fn missing_total_keyword_gives_zero() {
        let tokens = receipt(&["TOTAL 500"], &[("TOTAL", 10, 100), ("500", 200, 100)]);
        assert_eq!(Extractor::default().search_total(&tokens), 0);
    }

    #[test]
    fn empty_sequence_yields_default_info() {
        let info = Extractor::default()
            .aggregate(&TokenSequence::default(), &MerchantCatalog::builtin())
            .unwrap();
        assert_eq!(info, ReceiptInfo::default());
    }

    #[test]
    fn custom_total_keyword() {
        let config = ExtractorConfig { total_keyword: "TOTAL".into(), ..ExtractorConfig::default() };
        let tokens = receipt(&["TOTAL 500"], &[("TOTAL", 10, 100), ("500", 200, 100)]);
        assert_eq!(Extractor::new(config).search_total(&tokens), 500);
    }
}
