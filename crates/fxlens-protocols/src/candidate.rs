//! Currency match candidates produced by the extractor.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifies "this exact occurrence, converting to this target".
///
/// Rendered as `{raw}-{from}-{to}-{amount}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DedupKey(String);

impl DedupKey {
    pub fn new(raw_match_text: &str, from: &str, to: &str, amount: f64) -> Self {
        Self(format!("{}-{}-{}-{}", raw_match_text, from, to, amount))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DedupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A monetary amount found in a text segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchCandidate {
    /// Matched text without the surrounding boundary characters, e.g. `$1,234.56`.
    pub raw_match_text: String,

    /// Symbol or code as written, e.g. `$` or `kr`.
    pub symbol: String,

    /// Amount as written, e.g. `1,234.56`.
    pub amount_text: String,

    /// Parsed amount, always finite and positive.
    pub numeric_amount: f64,

    /// Resolved source currency code.
    pub currency_code: String,

    /// Byte offset of `raw_match_text` within the segment.
    pub offset: usize,

    pub dedup_key: DedupKey,
}

impl MatchCandidate {
    /// Byte offset just past the match.
    pub fn end(&self) -> usize {
        self.offset + self.raw_match_text.len()
    }
}
