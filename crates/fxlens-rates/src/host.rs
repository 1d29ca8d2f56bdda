//! Conversion host: answers `convertCurrency` messages and tracks badge updates.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use fxlens_protocols::{ConvertRequest, ConvertResponse, CurrencyConverter, HostMessage};
use tracing::{debug, warn};

/// Message handler sitting in front of a [`CurrencyConverter`].
pub struct ConversionHost {
    converter: Arc<dyn CurrencyConverter>,
    badge: AtomicU64,
}

impl ConversionHost {
    pub fn new(converter: Arc<dyn CurrencyConverter>) -> Self {
        Self {
            converter,
            badge: AtomicU64::new(0),
        }
    }

    /// Handle one message. Only conversion requests produce a response.
    pub async fn handle(&self, message: HostMessage) -> Option<ConvertResponse> {
        match message {
            HostMessage::ConvertCurrency(request) => Some(self.convert(request).await),
            HostMessage::UpdateBadge { count } => {
                debug!("Badge count -> {}", count);
                self.badge.store(count, Ordering::Relaxed);
                None
            }
        }
    }

    pub async fn convert(&self, request: ConvertRequest) -> ConvertResponse {
        let settings = request.settings();
        match self
            .converter
            .convert(
                request.amount,
                &request.from_currency,
                &request.target_currency,
                &settings,
            )
            .await
        {
            Ok(amount) => ConvertResponse::converted(amount),
            Err(e) => {
                warn!(
                    "Conversion {} {} -> {} failed: {}",
                    request.amount, request.from_currency, request.target_currency, e
                );
                ConvertResponse::failed(e.to_string())
            }
        }
    }

    /// Decode a JSON message and encode the response, `None` for one-way messages.
    pub async fn handle_json(&self, raw: &str) -> Result<Option<String>, serde_json::Error> {
        let message: HostMessage = serde_json::from_str(raw)?;
        match self.handle(message).await {
            Some(response) => serde_json::to_string(&response).map(Some),
            None => Ok(None),
        }
    }

    /// Last badge count received.
    pub fn badge_count(&self) -> u64 {
        self.badge.load(Ordering::Relaxed)
    }
}
