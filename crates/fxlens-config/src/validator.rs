//! Configuration validation.

use std::collections::HashSet;

use crate::error::ConfigError;
use crate::schema::{Config, PROVIDER_NAMES};

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Collapse the first error into a [`ConfigError`].
    pub fn into_result(self) -> Result<Vec<ValidationWarning>, ConfigError> {
        match self.errors.into_iter().next() {
            Some(err) => Err(ConfigError::InvalidValue {
                field: err.path,
                message: err.message,
            }),
            None => Ok(self.warnings),
        }
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> ValidationResult {
        let mut result = ValidationResult::default();

        Self::validate_settings(config, &mut result);
        Self::validate_scanner(config, &mut result);
        Self::validate_observer(config, &mut result);
        Self::validate_rates(config, &mut result);
        Self::validate_providers(config, &mut result);

        result
    }

    fn validate_settings(config: &Config, result: &mut ValidationResult) {
        let target = &config.settings.target_currency;
        if target.len() != 3 || !target.chars().all(|c| c.is_ascii_uppercase()) {
            result.add_error(ValidationError::new(
                "settings.target_currency",
                format!("'{}' is not a three-letter uppercase currency code", target),
            ));
        }

        for (path, key) in [
            (
                "settings.exchangerate_api_key",
                &config.settings.exchangerate_api_key,
            ),
            (
                "settings.freecurrency_api_key",
                &config.settings.freecurrency_api_key,
            ),
        ] {
            if matches!(key, Some(k) if k.trim().is_empty()) {
                result.add_warning(ValidationWarning::new(
                    path,
                    "API key is empty, the provider will be skipped",
                ));
            }
        }
    }

    fn validate_scanner(config: &Config, result: &mut ValidationResult) {
        let scanner = &config.scanner;

        if scanner.strategies.is_empty() {
            result.add_error(ValidationError::new(
                "scanner.strategies",
                "At least one placement strategy is required",
            ));
        }

        let mut seen = HashSet::new();
        for strategy in &scanner.strategies {
            if !seen.insert(strategy) {
                result.add_warning(ValidationWarning::new(
                    "scanner.strategies",
                    format!("Strategy '{}' is listed more than once", strategy.name()),
                ));
            }
        }

        if scanner.search_limit == 0 {
            result.add_warning(ValidationWarning::new(
                "scanner.search_limit",
                "search_limit is 0, detached anchors will never be recovered",
            ));
        }

        if scanner.insert_delay_ms > 10_000 {
            result.add_warning(ValidationWarning::new(
                "scanner.insert_delay_ms",
                "insert_delay_ms is very high (>10s)",
            ));
        }
    }

    fn validate_observer(config: &Config, result: &mut ValidationResult) {
        let observer = &config.observer;

        if observer.quiet_window_ms == 0 {
            result.add_error(ValidationError::new(
                "observer.quiet_window_ms",
                "quiet_window_ms must be greater than 0",
            ));
        }

        if observer.max_pending_nodes == 0 {
            result.add_error(ValidationError::new(
                "observer.max_pending_nodes",
                "max_pending_nodes must be greater than 0",
            ));
        }
    }

    fn validate_rates(config: &Config, result: &mut ValidationResult) {
        if config.rates.timeout_secs == 0 {
            result.add_error(ValidationError::new(
                "rates.timeout_secs",
                "timeout_secs must be greater than 0",
            ));
        }

        if config.rates.timeout_secs > 60 {
            result.add_warning(ValidationWarning::new(
                "rates.timeout_secs",
                "timeout_secs is very high (>60), failover will be slow",
            ));
        }
    }

    fn validate_providers(config: &Config, result: &mut ValidationResult) {
        for name in &config.rates.disabled {
            if !PROVIDER_NAMES.contains(&name.as_str()) {
                result.add_warning(ValidationWarning::new(
                    "rates.disabled",
                    format!("Unknown provider '{}'", name),
                ));
            }
        }

        if PROVIDER_NAMES
            .iter()
            .all(|name| config.rates.is_disabled(name))
        {
            result.add_error(ValidationError::new(
                "rates.disabled",
                "Every rate provider is disabled",
            ));
        }

        for (name, provider) in &config.providers {
            if !PROVIDER_NAMES.contains(&name.as_str()) {
                result.add_warning(ValidationWarning::new(
                    format!("providers.{}", name),
                    format!("Unknown provider '{}'", name),
                ));
            }

            let Some(base_url) = &provider.base_url else {
                continue;
            };
            if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
                result.add_error(ValidationError::new(
                    format!("providers.{}.base_url", name),
                    "base_url must start with http:// or https://",
                ));
            }
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
