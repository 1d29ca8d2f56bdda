//! # fxlens Protocols
//!
//! Shared types and trait seams for the fxlens workspace.
//! Contains only interface definitions - no implementations.
//!
//! ## Core Traits
//!
//! - [`RateProvider`] - Stateless request-builder / response-parser pair for one rate source
//! - [`RateTransport`] - Performs the HTTP GET for a provider request
//! - [`CurrencyConverter`] - Converts an amount between two currencies
//! - [`SettingsStore`] - Persists user settings outside the process
//!
//! ## Core Types
//!
//! - [`MatchCandidate`] / [`DedupKey`] - A currency occurrence found in text
//! - [`ConversionRecord`] - One successful conversion
//! - [`Settings`] / [`SettingsPatch`] - Target currency and provider credentials
//! - [`ControlRequest`] / [`ControlResponse`] - Boundary messages

pub mod candidate;
pub mod converter;
pub mod error;
pub mod message;
pub mod provider;
pub mod record;
pub mod settings;
pub mod store;

pub use candidate::{DedupKey, MatchCandidate};
pub use converter::CurrencyConverter;
pub use error::{
    AnnotationError, ConversionError, ProviderError, SettingsStoreError,
};
pub use message::{
    AckResponse, ControlRequest, ControlResponse, ConvertRequest, ConvertResponse, HostMessage,
    StatsResponse,
};
pub use provider::{RateProvider, RateQuery, RateTransport};
pub use record::ConversionRecord;
pub use settings::{Settings, SettingsPatch, DEFAULT_TARGET_CURRENCY};
pub use store::SettingsStore;
