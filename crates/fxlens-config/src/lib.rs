//! # fxlens Config
//!
//! Configuration management for fxlens: the TOML schema, a loader with
//! environment variable substitution, a validator, and a TOML-file
//! settings store.

mod error;
mod loader;
mod schema;
mod store;
mod validator;

pub use error::ConfigError;
pub use loader::{ConfigLoader, DEFAULT_CONFIG_PATH};
pub use schema::*;
pub use store::{TomlSettingsStore, DEFAULT_SETTINGS_PATH};
pub use validator::{ConfigValidator, ValidationError, ValidationResult, ValidationWarning};
