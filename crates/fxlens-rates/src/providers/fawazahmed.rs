//! fawazahmed0 currency-api, served from the jsDelivr CDN or its mirror.

use fxlens_protocols::{ProviderError, RateProvider, RateQuery, Settings};

pub const CDN_NAME: &str = "fawazahmed0-api";
pub const MIRROR_NAME: &str = "fawazahmed0-api-fallback";
const CDN_BASE_URL: &str = "https://cdn.jsdelivr.net";
const CDN_PREFIX: &str = "/npm/@fawazahmed0/currency-api@latest";
const MIRROR_BASE_URL: &str = "https://latest.currency-api.pages.dev";

/// Daily rate tables keyed by lowercase codes: `{"eur": {"usd": 1.08, ...}}`.
pub struct FawazahmedProvider {
    name: &'static str,
    base_url: String,
    prefix: &'static str,
}

impl FawazahmedProvider {
    /// The jsDelivr CDN endpoint.
    pub fn cdn() -> Self {
        Self::cdn_with_base_url(CDN_BASE_URL)
    }

    pub fn cdn_with_base_url(base_url: &str) -> Self {
        Self {
            name: CDN_NAME,
            base_url: super::trim_base(base_url),
            prefix: CDN_PREFIX,
        }
    }

    /// The pages.dev mirror.
    pub fn mirror() -> Self {
        Self::mirror_with_base_url(MIRROR_BASE_URL)
    }

    pub fn mirror_with_base_url(base_url: &str) -> Self {
        Self {
            name: MIRROR_NAME,
            base_url: super::trim_base(base_url),
            prefix: "",
        }
    }
}

impl RateProvider for FawazahmedProvider {
    fn name(&self) -> &str {
        self.name
    }

    fn build_request(&self, query: &RateQuery, _settings: &Settings) -> Result<String, ProviderError> {
        Ok(format!(
            "{}{}/v1/currencies/{}.json",
            self.base_url,
            self.prefix,
            query.from_lower()
        ))
    }

    fn parse_response(&self, query: &RateQuery, body: &serde_json::Value) -> Option<f64> {
        let rate = body
            .get(query.from_lower())?
            .get(query.to_lower())?
            .as_f64()?;
        Some(query.scale(rate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_names() {
        assert_eq!(FawazahmedProvider::cdn().name(), "fawazahmed0-api");
        assert_eq!(FawazahmedProvider::mirror().name(), "fawazahmed0-api-fallback");
        assert!(!FawazahmedProvider::cdn().requires_credential());
    }

    #[test]
    fn test_cdn_url() {
        let url = FawazahmedProvider::cdn()
            .build_request(&RateQuery::new(1.0, "EUR", "USD"), &Settings::default())
            .unwrap();
        assert_eq!(
            url,
            "https://cdn.jsdelivr.net/npm/@fawazahmed0/currency-api@latest/v1/currencies/eur.json"
        );
    }

    #[test]
    fn test_mirror_url() {
        let url = FawazahmedProvider::mirror()
            .build_request(&RateQuery::new(1.0, "JPY", "USD"), &Settings::default())
            .unwrap();
        assert_eq!(url, "https://latest.currency-api.pages.dev/v1/currencies/jpy.json");
    }

    #[test]
    fn test_parse_response() {
        let provider = FawazahmedProvider::cdn();
        let query = RateQuery::new(10.0, "EUR", "USD");
        let body = json!({"date": "2025-01-01", "eur": {"usd": 1.5, "gbp": 0.8}});
        assert_eq!(provider.parse_response(&query, &body), Some(15.0));
    }

    #[test]
    fn test_parse_response_missing_pair() {
        let provider = FawazahmedProvider::mirror();
        let query = RateQuery::new(10.0, "EUR", "XYZ");
        let body = json!({"eur": {"usd": 1.5}});
        assert_eq!(provider.parse_response(&query, &body), None);
        assert_eq!(provider.parse_response(&query, &json!({"eur": null})), None);
    }
}
