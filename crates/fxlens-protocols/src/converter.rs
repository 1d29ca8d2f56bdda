//! Currency conversion seam between the scanner and the rate layer.

use async_trait::async_trait;

use crate::error::ConversionError;
use crate::settings::Settings;

/// Converts an amount from one currency to another.
#[async_trait]
pub trait CurrencyConverter: Send + Sync {
    async fn convert(
        &self,
        amount: f64,
        from: &str,
        to: &str,
        settings: &Settings,
    ) -> Result<f64, ConversionError>;
}
