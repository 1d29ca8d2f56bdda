//! Match extractor: finds monetary amounts in a text segment.
//!
//! A match is a known currency symbol and an amount in either order, with at
//! most one whitespace character between them, bounded on both sides by the
//! string edge or a character that is not ASCII alphanumeric.

use fxlens_protocols::{DedupKey, MatchCandidate};
use regex::{Captures, Regex};
use tracing::trace;

use crate::currency::{self, CURRENCY_SYMBOLS};

const AMOUNT_PATTERN: &str = r"[0-9]+(?:[.,][0-9]{3})*(?:[.,][0-9]{1,2})?";

/// Compiled currency pattern.
#[derive(Debug, Clone)]
pub struct Extractor {
    pattern: Regex,
}

impl Extractor {
    /// Build the extractor from the currency table.
    pub fn new() -> Result<Self, regex::Error> {
        let symbols = CURRENCY_SYMBOLS
            .iter()
            .map(|(symbol, _)| regex::escape(symbol))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = format!(
            r"(?:({sym})\s?({amt}))|(?:({amt})\s?({sym}))",
            sym = symbols,
            amt = AMOUNT_PATTERN
        );
        Ok(Self {
            pattern: Regex::new(&pattern)?,
        })
    }

    /// Extract every candidate in `text` whose currency differs from `target`.
    ///
    /// Candidates come back in text order. Unknown symbols and unusable
    /// amounts are dropped silently.
    pub fn extract(&self, text: &str, target: &str) -> Vec<MatchCandidate> {
        let mut candidates = Vec::new();
        let mut pos = 0;

        while pos < text.len() {
            let Some(caps) = self.pattern.captures_at(text, pos) else {
                break;
            };
            let Some(whole) = caps.get(0) else {
                break;
            };
            let (start, end) = (whole.start(), whole.end());

            if !is_boundary_before(text, start) || !is_boundary_after(text, end) {
                pos = next_char(text, start);
                continue;
            }
            pos = end;

            if let Some(candidate) = build_candidate(&caps, whole.as_str(), start, target) {
                candidates.push(candidate);
            }
        }

        candidates
    }
}

fn build_candidate(
    caps: &Captures<'_>,
    raw: &str,
    offset: usize,
    target: &str,
) -> Option<MatchCandidate> {
    let (symbol, amount_text) = match (caps.get(1), caps.get(2), caps.get(3), caps.get(4)) {
        (Some(symbol), Some(amount), _, _) => (symbol.as_str(), amount.as_str()),
        (_, _, Some(amount), Some(symbol)) => (symbol.as_str(), amount.as_str()),
        _ => return None,
    };

    let Some(code) = currency::resolve(symbol) else {
        trace!("Skipping unknown symbol {:?}", symbol);
        return None;
    };
    if code == target {
        return None;
    }

    let Some(numeric_amount) = parse_amount(amount_text) else {
        trace!("Skipping unparseable amount {:?}", amount_text);
        return None;
    };

    Some(MatchCandidate {
        raw_match_text: raw.to_string(),
        symbol: symbol.to_string(),
        amount_text: amount_text.to_string(),
        numeric_amount,
        currency_code: code.to_string(),
        offset,
        dedup_key: DedupKey::new(raw, code, target, numeric_amount),
    })
}

/// Parse an amount as written: commas are dropped, then the longest leading
/// decimal number is read. `1.234,56` therefore reads as `1.23456`, a known
/// limit for dot-grouping locales.
pub fn parse_amount(amount_text: &str) -> Option<f64> {
    let stripped: String = amount_text.chars().filter(|c| *c != ',').collect();

    let mut seen_dot = false;
    let mut len = 0;
    for c in stripped.chars() {
        match c {
            '0'..='9' => len += 1,
            '.' if !seen_dot => {
                seen_dot = true;
                len += 1;
            }
            _ => break,
        }
    }

    let prefix = stripped[..len].trim_end_matches('.');
    let value: f64 = prefix.parse().ok()?;
    (value.is_finite() && value > 0.0).then_some(value)
}

fn is_boundary_before(text: &str, start: usize) -> bool {
    text[..start]
        .chars()
        .next_back()
        .is_none_or(|c| !c.is_ascii_alphanumeric())
}

fn is_boundary_after(text: &str, end: usize) -> bool {
    text[end..]
        .chars()
        .next()
        .is_none_or(|c| !c.is_ascii_alphanumeric())
}

fn next_char(text: &str, start: usize) -> usize {
    text[start..]
        .chars()
        .next()
        .map_or(text.len(), |c| start + c.len_utf8())
}

#[cfg(test)]
#[path = "extractor_tests.rs"]
mod tests;
