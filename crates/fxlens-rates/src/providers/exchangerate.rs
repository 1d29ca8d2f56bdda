//! ExchangeRate-API pair conversion (requires a key).

use fxlens_protocols::{ProviderError, RateProvider, RateQuery, Settings};

use crate::api::{decode, PairConversionResponse};

pub const NAME: &str = "exchangerate-api";
const DEFAULT_BASE_URL: &str = "https://v6.exchangerate-api.com";

pub struct ExchangeRateApiProvider {
    base_url: String,
}

impl ExchangeRateApiProvider {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Create provider against a custom host.
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            base_url: super::trim_base(base_url),
        }
    }
}

impl Default for ExchangeRateApiProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl RateProvider for ExchangeRateApiProvider {
    fn name(&self) -> &str {
        NAME
    }

    fn requires_credential(&self) -> bool {
        true
    }

    fn is_available(&self, settings: &Settings) -> bool {
        settings.exchangerate_key().is_some()
    }

    fn build_request(&self, query: &RateQuery, settings: &Settings) -> Result<String, ProviderError> {
        let key = settings
            .exchangerate_key()
            .ok_or_else(|| ProviderError::MissingCredential(NAME.to_string()))?;
        Ok(format!(
            "{}/v6/{}/pair/{}/{}/{}",
            self.base_url, key, query.from, query.to, query.amount
        ))
    }

    fn parse_response(&self, _query: &RateQuery, body: &serde_json::Value) -> Option<f64> {
        decode::<PairConversionResponse>(body)?.conversion_result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn keyed() -> Settings {
        Settings {
            exchangerate_api_key: Some("k123".to_string()),
            ..Settings::default()
        }
    }

    #[test]
    fn test_requires_key() {
        let provider = ExchangeRateApiProvider::new();
        assert!(provider.requires_credential());
        assert!(!provider.is_available(&Settings::default()));
        assert!(provider.is_available(&keyed()));
    }

    #[test]
    fn test_build_request() {
        let provider = ExchangeRateApiProvider::new();
        let url = provider
            .build_request(&RateQuery::new(20.0, "eur", "usd"), &keyed())
            .unwrap();
        assert_eq!(url, "https://v6.exchangerate-api.com/v6/k123/pair/EUR/USD/20");
    }

    #[test]
    fn test_build_request_without_key() {
        let provider = ExchangeRateApiProvider::new();
        let err = provider
            .build_request(&RateQuery::new(1.0, "EUR", "USD"), &Settings::default())
            .unwrap_err();
        assert!(matches!(err, ProviderError::MissingCredential(_)));
    }

    #[test]
    fn test_parse_response() {
        let provider = ExchangeRateApiProvider::new();
        let query = RateQuery::new(20.0, "EUR", "USD");
        assert_eq!(
            provider.parse_response(&query, &json!({"result": "success", "conversion_result": 21.7})),
            Some(21.7)
        );
        assert_eq!(
            provider.parse_response(&query, &json!({"result": "error", "error-type": "invalid-key"})),
            None
        );
    }

    #[test]
    fn test_custom_base_url_trailing_slash() {
        let provider = ExchangeRateApiProvider::with_base_url("http://localhost:1234/");
        let url = provider
            .build_request(&RateQuery::new(1.5, "GBP", "JPY"), &keyed())
            .unwrap();
        assert_eq!(url, "http://localhost:1234/v6/k123/pair/GBP/JPY/1.5");
    }
}
