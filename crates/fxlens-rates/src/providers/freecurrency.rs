//! FreeCurrencyAPI latest rates (requires a key).

use fxlens_protocols::{ProviderError, RateProvider, RateQuery, Settings};
use url::Url;

use crate::api::{decode, LatestRatesResponse};

pub const NAME: &str = "free-currency-api";
const DEFAULT_BASE_URL: &str = "https://api.freecurrencyapi.com";

pub struct FreeCurrencyApiProvider {
    base_url: String,
}

impl FreeCurrencyApiProvider {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            base_url: super::trim_base(base_url),
        }
    }
}

impl Default for FreeCurrencyApiProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl RateProvider for FreeCurrencyApiProvider {
    fn name(&self) -> &str {
        NAME
    }

    fn requires_credential(&self) -> bool {
        true
    }

    fn is_available(&self, settings: &Settings) -> bool {
        settings.freecurrency_key().is_some()
    }

    fn build_request(&self, query: &RateQuery, settings: &Settings) -> Result<String, ProviderError> {
        let key = settings
            .freecurrency_key()
            .ok_or_else(|| ProviderError::MissingCredential(NAME.to_string()))?;
        let url = Url::parse_with_params(
            &format!("{}/v1/latest", self.base_url),
            &[
                ("apikey", key),
                ("currencies", query.to.as_str()),
                ("base_currency", query.from.as_str()),
            ],
        )
        .map_err(|e| ProviderError::InvalidRequest(e.to_string()))?;
        Ok(url.into())
    }

    fn parse_response(&self, query: &RateQuery, body: &serde_json::Value) -> Option<f64> {
        let rate = *decode::<LatestRatesResponse>(body)?.data.get(&query.to)?;
        Some(query.scale(rate))
    }
}
