//! Rate provider trait definitions.

use async_trait::async_trait;

use super::RateQuery;
use crate::error::ProviderError;
use crate::settings::Settings;

/// Descriptor for one remote rate source.
///
/// Implementations hold no mutable state; the order in which they are
/// registered is the failover priority.
pub trait RateProvider: Send + Sync {
    /// Returns the provider name.
    fn name(&self) -> &str;

    /// Whether the provider needs a credential from the settings.
    fn requires_credential(&self) -> bool {
        false
    }

    /// Whether the provider can be used with these settings.
    fn is_available(&self, settings: &Settings) -> bool {
        let _ = settings;
        true
    }

    /// Build the request URL for a query.
    fn build_request(&self, query: &RateQuery, settings: &Settings)
        -> Result<String, ProviderError>;

    /// Extract the converted amount from a response body.
    ///
    /// `None` means the provider had no rate for this pair.
    fn parse_response(&self, query: &RateQuery, body: &serde_json::Value) -> Option<f64>;
}

/// Performs the HTTP exchange for a provider request.
#[async_trait]
pub trait RateTransport: Send + Sync {
    /// GET the URL and decode a JSON body. Non-success statuses are errors.
    async fn get_json(&self, url: &str) -> Result<serde_json::Value, ProviderError>;
}
