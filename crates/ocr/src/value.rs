/// First entry of `row` that reads as an integer once spaces and thousands
/// separators are dropped, or `0` when none does.
pub fn extract_integer<S: AsRef<str>>(row: &[S]) -> i64 {
    row.iter().find_map(|entry| parse_integer(entry.as_ref())).unwrap_or(0)
}

/// Parse a single OCR fragment as an integer amount. Full-width digits (`１２３`)
/// are read like their ASCII counterparts.
///
/// A value outside the `i64` range does not parse, so [`extract_integer`] moves
/// on to the next entry of the row instead of returning it.
pub fn parse_integer(text: &str) -> Option<i64> {
    let clean: String = text
        .chars()
        .filter(|c| *c != ' ' && *c != ',')
        .map(|c| match c {
            '０'..='９' => char::from(b'0' + (c as u32 - '０' as u32) as u8),
            other => other,
        })
        .collect();
    clean.trim().parse().ok()
}
