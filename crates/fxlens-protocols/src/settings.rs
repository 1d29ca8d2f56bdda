//! User settings shared by every component.

use serde::{Deserialize, Serialize};

/// Target currency used when nothing is configured.
pub const DEFAULT_TARGET_CURRENCY: &str = "USD";

/// Process-wide settings snapshot.
///
/// Field names follow the persisted storage keys (`targetCurrency`, ...);
/// snake_case aliases are accepted so the same struct reads from TOML config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default = "default_target_currency", alias = "target_currency")]
    pub target_currency: String,

    #[serde(
        default,
        alias = "exchangerate_api_key",
        skip_serializing_if = "Option::is_none"
    )]
    pub exchangerate_api_key: Option<String>,

    #[serde(
        default,
        alias = "freecurrency_api_key",
        skip_serializing_if = "Option::is_none"
    )]
    pub freecurrency_api_key: Option<String>,
}

fn default_target_currency() -> String {
    DEFAULT_TARGET_CURRENCY.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            target_currency: default_target_currency(),
            exchangerate_api_key: None,
            freecurrency_api_key: None,
        }
    }
}

impl Settings {
    /// Create settings with the given target currency.
    pub fn with_target(target: impl Into<String>) -> Self {
        Self {
            target_currency: target.into().trim().to_ascii_uppercase(),
            ..Self::default()
        }
    }

    /// ExchangeRate-API key, if a non-empty one is configured.
    pub fn exchangerate_key(&self) -> Option<&str> {
        non_empty(self.exchangerate_api_key.as_deref())
    }

    /// FreeCurrencyAPI key, if a non-empty one is configured.
    pub fn freecurrency_key(&self) -> Option<&str> {
        non_empty(self.freecurrency_api_key.as_deref())
    }

    /// Merge a partial update. Returns true when the target currency changed.
    pub fn apply(&mut self, patch: SettingsPatch) -> bool {
        let mut target_changed = false;
        if let Some(target) = patch.target_currency {
            let target = target.trim().to_ascii_uppercase();
            if !target.is_empty() && target != self.target_currency {
                self.target_currency = target;
                target_changed = true;
            }
        }
        if let Some(key) = patch.exchangerate_api_key {
            self.exchangerate_api_key = Some(key);
        }
        if let Some(key) = patch.freecurrency_api_key {
            self.freecurrency_api_key = Some(key);
        }
        target_changed
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Partial settings update received over the boundary surface.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_currency: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exchangerate_api_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub freecurrency_api_key: Option<String>,
}

#[cfg(test)]
#[path = "settings_tests.rs"]
mod tests;
