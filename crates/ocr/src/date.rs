use std::fmt;
use std::sync::OnceLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use thiserror::Error;

// ── Compiled regex cache ─────────────────────────────────────────────────────

macro_rules! re {
    ($name:ident, $pat:expr) => {
        fn $name() -> &'static Regex {
            static R: OnceLock<Regex> = OnceLock::new();
            R.get_or_init(|| Regex::new($pat).expect("invalid regex"))
        }
    };
}

re!(re_receipt_date,
    r"^([0-9]{2,4})([/年])([0-9]{1,2})([/月])([0-9]{1,2})");

/// The two separator styles a receipt date can be printed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateGrammar {
    /// `2023/4/5`, `23/4/5`
    Slash,
    /// `2023年4月5`, `23年4月5`
    Glyph,
}

impl DateGrammar {
    fn separators(self) -> (&'static str, &'static str) {
        match self {
            DateGrammar::Slash => ("/", "/"),
            DateGrammar::Glyph => ("年", "月"),
        }
    }
}

impl fmt::Display for DateGrammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateGrammar::Slash => write!(f, "slash"),
            DateGrammar::Glyph => write!(f, "year/month glyph"),
        }
    }
}

/// A line started like a date but no year width of its grammar produced a real one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Malformed receipt date '{text}' ({grammar} grammar)")]
pub struct DateParseError {
    pub text: String,
    pub grammar: DateGrammar,
}

/// Recognizes dates printed at the start of a receipt line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateParser {
    two_digit_year_pivot: u32,
}

impl Default for DateParser {
    fn default() -> Self {
        Self::new(69)
    }
}

impl DateParser {
    /// `pivot` decides the century of two-digit years: `yy < pivot` is 20yy,
    /// anything else 19yy.
    pub fn new(two_digit_year_pivot: u32) -> Self {
        Self { two_digit_year_pivot }
    }

    /// `Ok(None)` when the line does not start with a date shape, `Err` when it does
    /// but the digits do not form a calendar date under either year width.
    pub fn parse(&self, line: &str) -> Result<Option<NaiveDate>, DateParseError> {
        let Some(c) = re_receipt_date().captures(line) else {
            return Ok(None);
        };
        let text = &c[0];
        let grammar = if text.contains('年') || text.contains('月') {
            DateGrammar::Glyph
        } else {
            DateGrammar::Slash
        };

        // Both separators must belong to the detected grammar; `2023年4/5` fails both widths.
        let (first, second) = grammar.separators();
        let date = if &c[2] == first && &c[4] == second {
            self.four_digit_year(&c[1])
                .or_else(|| self.two_digit_year(&c[1]))
                .and_then(|year| {
                    let month: u32 = c[3].parse().ok()?;
                    let day: u32 = c[5].parse().ok()?;
                    NaiveDate::from_ymd_opt(year, month, day)
                })
        } else {
            None
        };

        match date {
            Some(d) => Ok(Some(d)),
            None => Err(DateParseError { text: text.to_string(), grammar }),
        }
    }

    /// Date on `line` in receipt format, or `""` when there is none (including
    /// malformed date-shaped lines).
    pub fn parse_date(&self, line: &str) -> String {
        match self.parse(line) {
            Ok(Some(date)) => format_receipt_date(date),
            Ok(None) | Err(_) => String::new(),
        }
    }

    fn four_digit_year(&self, digits: &str) -> Option<i32> {
        if digits.len() != 4 {
            return None;
        }
        digits.parse().ok().filter(|y| *y >= 1)
    }

    fn two_digit_year(&self, digits: &str) -> Option<i32> {
        if digits.len() != 2 {
            return None;
        }
        let yy: u32 = digits.parse().ok()?;
        let century = if yy < self.two_digit_year_pivot { 2000 } else { 1900 };
        i32::try_from(century + yy).ok()
    }
}

/// `YYYY-M-D` with no zero padding.
pub fn format_receipt_date(date: NaiveDate) -> String {
    format!("{}-{}-{}", date.year(), date.month(), date.day())
}
