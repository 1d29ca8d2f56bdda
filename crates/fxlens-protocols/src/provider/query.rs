//! Conversion query passed to providers.

use serde::{Deserialize, Serialize};

/// One amount to convert between two currency codes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateQuery {
    pub amount: f64,
    pub from: String,
    pub to: String,
}

impl RateQuery {
    pub fn new(amount: f64, from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            amount,
            from: from.into().to_ascii_uppercase(),
            to: to.into().to_ascii_uppercase(),
        }
    }

    /// Lowercase source code, as used by the fawazahmed0 endpoints.
    pub fn from_lower(&self) -> String {
        self.from.to_ascii_lowercase()
    }

    /// Lowercase target code.
    pub fn to_lower(&self) -> String {
        self.to.to_ascii_lowercase()
    }

    /// Scale a per-unit rate to this query's amount.
    pub fn scale(&self, rate: f64) -> f64 {
        self.amount * rate
    }
}

/// Whether a parsed value is usable as a conversion result.
pub fn is_usable_amount(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_normalizes_codes() {
        let query = RateQuery::new(10.0, "eur", "usd");
        assert_eq!(query.from, "EUR");
        assert_eq!(query.to, "USD");
        assert_eq!(query.from_lower(), "eur");
        assert_eq!(query.to_lower(), "usd");
    }

    #[test]
    fn test_scale() {
        let query = RateQuery::new(4.0, "GBP", "USD");
        assert_eq!(query.scale(1.25), 5.0);
    }

    #[test]
    fn test_usable_amount() {
        assert!(is_usable_amount(0.01));
        assert!(!is_usable_amount(0.0));
        assert!(!is_usable_amount(-3.0));
        assert!(!is_usable_amount(f64::NAN));
        assert!(!is_usable_amount(f64::INFINITY));
    }
}
