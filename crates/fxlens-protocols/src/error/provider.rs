//! Rate provider errors.

use thiserror::Error;

/// Failure of a single rate provider. Always non-fatal: the orchestrator
/// moves on to the next provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Missing credential for provider: {0}")]
    MissingCredential(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Provider declined: {0}")]
    Declined(String),

    #[error("Timeout after {0} seconds")]
    Timeout(u64),
}

impl ProviderError {
    /// Whether the provider answered but had no usable rate.
    pub fn is_declined(&self) -> bool {
        matches!(self, Self::Declined(_))
    }
}

#[cfg(test)]
#[path = "provider_tests.rs"]
mod tests;
