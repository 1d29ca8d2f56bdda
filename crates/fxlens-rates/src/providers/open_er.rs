//! open.er-api.com latest rates, the keyless backup.

use fxlens_protocols::{ProviderError, RateProvider, RateQuery, Settings};

use crate::api::{decode, OpenRatesResponse};

pub const NAME: &str = "backup-api";
const DEFAULT_BASE_URL: &str = "https://open.er-api.com";

pub struct OpenErApiProvider {
    base_url: String,
}

impl OpenErApiProvider {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            base_url: super::trim_base(base_url),
        }
    }
}

impl Default for OpenErApiProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl RateProvider for OpenErApiProvider {
    fn name(&self) -> &str {
        NAME
    }

    fn build_request(&self, query: &RateQuery, _settings: &Settings) -> Result<String, ProviderError> {
        Ok(format!("{}/v6/latest/{}", self.base_url, query.from))
    }

    fn parse_response(&self, query: &RateQuery, body: &serde_json::Value) -> Option<f64> {
        let rate = *decode::<OpenRatesResponse>(body)?.rates.get(&query.to)?;
        Some(query.scale(rate))
    }
}
