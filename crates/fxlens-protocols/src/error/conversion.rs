//! Conversion errors surfaced to the scanning layer.

use thiserror::Error;

/// Terminal outcome of a conversion attempt.
#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("All currency conversion providers failed ({attempted} attempted)")]
    AllProvidersFailed { attempted: usize },

    #[error("Invalid conversion input: {0}")]
    InvalidInput(String),
}
