//! # fxlens Rates
//!
//! Remote exchange rate providers and the failover orchestrator.
//!
//! ## Components
//!
//! - [`ProviderRegistry`] - Ordered list of [`RateProvider`](fxlens_protocols::RateProvider)s
//! - [`RateOrchestrator`] - Tries providers in priority order until one answers
//! - [`ReqwestTransport`] - JSON-over-HTTP transport
//! - [`ConversionHost`] - Handles `convertCurrency` / `updateBadge` messages

pub mod api;
pub mod host;
pub mod orchestrator;
pub mod providers;
pub mod registry;
pub mod transport;

pub use host::ConversionHost;
pub use orchestrator::RateOrchestrator;
pub use registry::ProviderRegistry;
pub use transport::ReqwestTransport;
