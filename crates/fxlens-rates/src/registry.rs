//! Ordered provider registry.
//!
//! Registration order is failover priority.

use std::sync::Arc;

use fxlens_config::Config;
use fxlens_protocols::RateProvider;
use tracing::debug;

use crate::providers::{
    ExchangeRateApiProvider, FawazahmedProvider, FreeCurrencyApiProvider, OpenErApiProvider,
};

/// Registry of rate providers, tried first to last.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    providers: Vec<Arc<dyn RateProvider>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// All built-in providers at their public endpoints.
    pub fn builtin() -> Self {
        Self::from_config(&Config::default())
    }

    /// Built-in providers with base URL overrides applied and disabled ones left out.
    pub fn from_config(config: &Config) -> Self {
        let url = |name: &str| config.provider_base_url(name);
        let candidates: Vec<Arc<dyn RateProvider>> = vec![
            Arc::new(match url(crate::providers::EXCHANGERATE) {
                Some(base) => ExchangeRateApiProvider::with_base_url(base),
                None => ExchangeRateApiProvider::new(),
            }),
            Arc::new(match url(crate::providers::FREECURRENCY) {
                Some(base) => FreeCurrencyApiProvider::with_base_url(base),
                None => FreeCurrencyApiProvider::new(),
            }),
            Arc::new(match url(crate::providers::FAWAZ_CDN) {
                Some(base) => FawazahmedProvider::cdn_with_base_url(base),
                None => FawazahmedProvider::cdn(),
            }),
            Arc::new(match url(crate::providers::FAWAZ_MIRROR) {
                Some(base) => FawazahmedProvider::mirror_with_base_url(base),
                None => FawazahmedProvider::mirror(),
            }),
            Arc::new(match url(crate::providers::OPEN_ER) {
                Some(base) => OpenErApiProvider::with_base_url(base),
                None => OpenErApiProvider::new(),
            }),
        ];

        let mut registry = Self::new();
        for provider in candidates {
            if config.rates.is_disabled(provider.name()) {
                debug!("Provider {} disabled by config", provider.name());
                continue;
            }
            registry.register(provider);
        }
        registry
    }

    /// Append a provider at the lowest priority.
    pub fn register(&mut self, provider: Arc<dyn RateProvider>) {
        self.providers.push(provider);
    }

    pub fn providers(&self) -> &[Arc<dyn RateProvider>] {
        &self.providers
    }

    pub fn names(&self) -> Vec<String> {
        self.providers.iter().map(|p| p.name().to_string()).collect()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fxlens_config::{ProviderConfig, PROVIDER_NAMES};
    use fxlens_protocols::{RateQuery, Settings};

    #[test]
    fn test_builtin_order_matches_names() {
        let registry = ProviderRegistry::builtin();
        assert_eq!(registry.names(), PROVIDER_NAMES.to_vec());
    }

    #[test]
    fn test_disabled_providers_are_skipped() {
        let mut config = Config::default();
        config.rates.disabled = vec!["fawazahmed0-api".to_string(), "backup-api".to_string()];
        let registry = ProviderRegistry::from_config(&config);
        assert_eq!(
            registry.names(),
            vec!["exchangerate-api", "free-currency-api", "fawazahmed0-api-fallback"]
        );
    }

    #[test]
    fn test_base_url_override() {
        let mut config = Config::default();
        config.providers.insert(
            "backup-api".to_string(),
            ProviderConfig {
                base_url: Some("http://127.0.0.1:9000/".to_string()),
            },
        );
        let registry = ProviderRegistry::from_config(&config);
        let backup = registry
            .providers()
            .iter()
            .find(|p| p.name() == "backup-api")
            .unwrap();
        let url = backup
            .build_request(&RateQuery::new(1.0, "EUR", "USD"), &Settings::default())
            .unwrap();
        assert_eq!(url, "http://127.0.0.1:9000/v6/latest/EUR");
    }

    #[test]
    fn test_empty_registry() {
        let registry = ProviderRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
    }
}
