//! Priority failover across rate providers.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use fxlens_config::Config;
use fxlens_protocols::provider::is_usable_amount;
use fxlens_protocols::{
    ConversionError, CurrencyConverter, ProviderError, RateProvider, RateQuery, RateTransport,
    Settings,
};
use tracing::{debug, info, warn};

use crate::registry::ProviderRegistry;
use crate::transport::ReqwestTransport;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Tries each provider in priority order and returns the first usable amount.
///
/// Providers needing a credential are skipped when the settings carry none.
/// Every per-provider failure (network, status, timeout, missing pair) is
/// logged and the next provider is consulted.
pub struct RateOrchestrator {
    registry: ProviderRegistry,
    transport: Arc<dyn RateTransport>,
    timeout: Duration,
}

impl RateOrchestrator {
    pub fn new(registry: ProviderRegistry, transport: Arc<dyn RateTransport>) -> Self {
        Self {
            registry,
            transport,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Orchestrator over the configured providers using a reqwest transport.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            ProviderRegistry::from_config(config),
            Arc::new(ReqwestTransport::new()),
        )
        .with_timeout(config.rates.timeout())
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Run a query against the providers usable with `settings`.
    pub async fn convert_query(
        &self,
        query: &RateQuery,
        settings: &Settings,
    ) -> Result<f64, ConversionError> {
        if !is_usable_amount(query.amount) {
            return Err(ConversionError::InvalidInput(format!(
                "amount must be a positive number, got {}",
                query.amount
            )));
        }
        if query.from.is_empty() || query.to.is_empty() {
            return Err(ConversionError::InvalidInput(
                "currency codes must not be empty".to_string(),
            ));
        }

        let mut attempted = 0;
        for provider in self.registry.providers() {
            if !provider.is_available(settings) {
                debug!("Skipping {}: no credential configured", provider.name());
                continue;
            }
            attempted += 1;

            match self.try_provider(provider.as_ref(), query, settings).await {
                Ok(amount) => {
                    info!(
                        "Converted {} {} -> {:.4} {} via {}",
                        query.amount,
                        query.from,
                        amount,
                        query.to,
                        provider.name()
                    );
                    return Ok(amount);
                }
                Err(e) => {
                    warn!("Provider {} failed: {}", provider.name(), e);
                }
            }
        }

        warn!(
            "All currency conversion providers failed for {} {} -> {}",
            query.amount, query.from, query.to
        );
        Err(ConversionError::AllProvidersFailed { attempted })
    }

    async fn try_provider(
        &self,
        provider: &dyn RateProvider,
        query: &RateQuery,
        settings: &Settings,
    ) -> Result<f64, ProviderError> {
        let url = provider.build_request(query, settings)?;
        let body = tokio::time::timeout(self.timeout, self.transport.get_json(&url))
            .await
            .map_err(|_| ProviderError::Timeout(self.timeout.as_secs()))??;

        match provider.parse_response(query, &body) {
            Some(amount) if is_usable_amount(amount) => Ok(amount),
            Some(amount) => Err(ProviderError::Declined(format!(
                "unusable amount {}",
                amount
            ))),
            None => Err(ProviderError::Declined(format!(
                "no rate for {}/{}",
                query.from, query.to
            ))),
        }
    }
}

#[async_trait]
impl CurrencyConverter for RateOrchestrator {
    async fn convert(
        &self,
        amount: f64,
        from: &str,
        to: &str,
        settings: &Settings,
    ) -> Result<f64, ConversionError> {
        self.convert_query(&RateQuery::new(amount, from, to), settings)
            .await
    }
}

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod tests;
