use kaikei_core::{Orientation, TokenSequence, Vertex};
use tracing::debug;

use crate::config::ExtractorConfig;

/// Locates the fragments printed on the same visual row as a search term.
///
/// The anchor is the **last** fragment containing the term: receipts often print a
/// subtotal line with the same label above the real total.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowFinder {
    tolerance: f64,
    overflow_limit: usize,
}

impl Default for RowFinder {
    fn default() -> Self {
        Self::from_config(&ExtractorConfig::default())
    }
}

impl RowFinder {
    pub fn new(tolerance: f64, overflow_limit: usize) -> Self {
        Self { tolerance, overflow_limit }
    }

    pub fn from_config(config: &ExtractorConfig) -> Self {
        Self::new(config.row_tolerance, config.row_overflow_limit)
    }

    /// Descriptions of every fragment on the anchor's row, in sequence order.
    ///
    /// Empty when no fragment contains `search_term`. A vertical row that collects
    /// `overflow_limit` members or more is treated as a false alignment (a column of
    /// prices, usually) and the horizontal row is returned instead, whatever its size.
    pub fn find_row<'a>(&self, tokens: &'a TokenSequence, search_term: &str) -> Vec<&'a str> {
        let Some(anchor) = last_target(tokens, search_term) else {
            debug!(
                search_term,
                full_text = tokens.full_text().unwrap_or_default(),
                "search term not found"
            );
            return Vec::new();
        };

        let mut orientation = Orientation::Vertical;
        loop {
            let row = self.scan(tokens, anchor, search_term, orientation);
            match orientation {
                Orientation::Vertical if row.len() >= self.overflow_limit => {
                    let next = Orientation::Horizontal;
                    debug!(
                        members = row.len(),
                        from = %orientation,
                        to = %next,
                        "row overflowed, rescanning"
                    );
                    orientation = next;
                }
                _ => return row,
            }
        }
    }

    /// Single pass along one axis around `anchor`, without any fallback.
    pub fn scan<'a>(
        &self,
        tokens: &'a TokenSequence,
        anchor: Vertex,
        search_term: &str,
        orientation: Orientation,
    ) -> Vec<&'a str> {
        let height = f64::from(orientation.coordinate(anchor));
        let adjusted_down = height * self.tolerance;
        let adjusted_up = height / self.tolerance;

        tokens
            .words()
            .iter()
            .filter(|f| {
                let position = f64::from(orientation.coordinate(f.anchor));
                position > adjusted_down
                    && position < adjusted_up
                    && !f.description.contains(search_term)
            })
            .map(|f| f.description.as_str())
            .collect()
    }
}

/// Anchor of the last word fragment whose text contains `search_term`.
pub fn last_target(tokens: &TokenSequence, search_term: &str) -> Option<Vertex> {
    tokens
        .words()
        .iter()
        .rev()
        .find(|f| f.description.contains(search_term))
        .map(|f| f.anchor)
}
