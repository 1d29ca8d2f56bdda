//! Configuration schema definitions.

use std::collections::HashMap;
use std::time::Duration;

use fxlens_protocols::Settings;
use serde::{Deserialize, Serialize};

/// Names of the built-in rate providers, in default priority order.
pub const PROVIDER_NAMES: &[&str] = &[
    "exchangerate-api",
    "free-currency-api",
    "fawazahmed0-api",
    "fawazahmed0-api-fallback",
    "backup-api",
];

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Initial user settings (target currency and credentials).
    #[serde(default)]
    pub settings: Settings,

    #[serde(default)]
    pub scanner: ScannerConfig,

    #[serde(default)]
    pub observer: ObserverConfig,

    #[serde(default)]
    pub rates: RatesConfig,

    /// Per-provider overrides, keyed by provider name.
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Placement strategies of the annotation inserter, tried in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementStrategy {
    /// Append the marker to the anchor's original parent.
    Append,
    /// Insert the marker right after the anchor.
    NextSibling,
    /// Split the anchor text and splice the marker in between.
    Split,
}

impl PlacementStrategy {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Append => "append",
            Self::NextSibling => "next_sibling",
            Self::Split => "split",
        }
    }
}

/// Scanner and annotation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScannerConfig {
    /// Text segments shorter than this (after trimming, in chars) are skipped.
    #[serde(default = "default_min_text_len")]
    pub min_text_len: usize,

    /// Delay between a successful conversion and its insertion.
    #[serde(default = "default_insert_delay_ms")]
    pub insert_delay_ms: u64,

    /// Maximum nodes visited by the detached-anchor fallback search.
    #[serde(default = "default_search_limit")]
    pub search_limit: usize,

    #[serde(default = "default_strategies")]
    pub strategies: Vec<PlacementStrategy>,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            min_text_len: default_min_text_len(),
            insert_delay_ms: default_insert_delay_ms(),
            search_limit: default_search_limit(),
            strategies: default_strategies(),
        }
    }
}

impl ScannerConfig {
    pub fn insert_delay(&self) -> Duration {
        Duration::from_millis(self.insert_delay_ms)
    }
}

fn default_min_text_len() -> usize {
    3
}

fn default_insert_delay_ms() -> u64 {
    100
}

fn default_search_limit() -> usize {
    10_000
}

fn default_strategies() -> Vec<PlacementStrategy> {
    vec![
        PlacementStrategy::Append,
        PlacementStrategy::NextSibling,
        PlacementStrategy::Split,
    ]
}

/// Change observer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObserverConfig {
    /// Quiet period after the last mutation batch before queued nodes are scanned.
    #[serde(default = "default_quiet_window_ms")]
    pub quiet_window_ms: u64,

    /// Delay after startup before queued conversions are dispatched.
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,

    /// Upper bound on queued nodes; overflow collapses into a root rescan.
    #[serde(default = "default_max_pending_nodes")]
    pub max_pending_nodes: usize,

    /// Whether scanning is enabled when a session starts.
    #[serde(default = "default_enabled")]
    pub enabled_on_start: bool,
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self {
            quiet_window_ms: default_quiet_window_ms(),
            settle_delay_ms: default_settle_delay_ms(),
            max_pending_nodes: default_max_pending_nodes(),
            enabled_on_start: default_enabled(),
        }
    }
}

impl ObserverConfig {
    pub fn quiet_window(&self) -> Duration {
        Duration::from_millis(self.quiet_window_ms)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

fn default_quiet_window_ms() -> u64 {
    1000
}

fn default_settle_delay_ms() -> u64 {
    3000
}

fn default_max_pending_nodes() -> usize {
    1024
}

fn default_enabled() -> bool {
    true
}

/// Conversion orchestrator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatesConfig {
    /// Per-provider request timeout before failing over.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Provider names that are never tried.
    #[serde(default)]
    pub disabled: Vec<String>,
}

impl Default for RatesConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            disabled: Vec::new(),
        }
    }
}

impl RatesConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn is_disabled(&self, provider: &str) -> bool {
        self.disabled.iter().any(|name| name == provider)
    }
}

fn default_timeout_secs() -> u64 {
    10
}

/// Provider override.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Also write daily-rotated log files.
    #[serde(default)]
    pub file: bool,

    /// Log directory (defaults to `~/.fxlens/logs`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: false,
            dir: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Base URL override for a provider, if configured.
    pub fn provider_base_url(&self, provider: &str) -> Option<&str> {
        self.providers
            .get(provider)
            .and_then(|p| p.base_url.as_deref())
    }
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
