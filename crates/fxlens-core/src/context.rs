//! Converter context shared by every component.

use std::sync::atomic::{AtomicBool, Ordering};

use fxlens_config::ScannerConfig;
use fxlens_protocols::{Settings, SettingsPatch, StatsResponse};
use parking_lot::{Mutex, MutexGuard, RwLock};
use tokio::sync::watch;
use tracing::{debug, info};

use crate::tracker::StateTracker;

/// Settings, scan state and counters for one document.
///
/// Held behind an `Arc` by the scanner, the observer and the control
/// surface. When the document lock is also needed it is always taken first.
pub struct ConverterContext {
    settings: RwLock<Settings>,
    state: Mutex<StateTracker>,
    enabled: AtomicBool,
    scanning: AtomicBool,
    badge: watch::Sender<u64>,
    config: ScannerConfig,
}

impl ConverterContext {
    pub fn new(settings: Settings, config: ScannerConfig) -> Self {
        let (badge, _) = watch::channel(0);
        Self {
            settings: RwLock::new(settings),
            state: Mutex::new(StateTracker::new()),
            enabled: AtomicBool::new(true),
            scanning: AtomicBool::new(false),
            badge,
            config,
        }
    }

    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    // ---- settings ----

    /// Snapshot of the current settings.
    pub fn settings(&self) -> Settings {
        self.settings.read().clone()
    }

    pub fn target_currency(&self) -> String {
        self.settings.read().target_currency.clone()
    }

    /// Merge a partial update. Returns true when the target currency changed.
    pub fn update_settings(&self, patch: SettingsPatch) -> bool {
        let changed = self.settings.write().apply(patch);
        if changed {
            info!("Target currency changed to {}", self.target_currency());
        }
        changed
    }

    pub fn replace_settings(&self, settings: Settings) {
        *self.settings.write() = settings;
    }

    // ---- flags ----

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::SeqCst);
    }

    /// Whether a full scan is running.
    pub fn is_scanning(&self) -> bool {
        self.scanning.load(Ordering::SeqCst)
    }

    /// Claim the scan flag. `None` when a full scan is already running.
    pub fn begin_scan(&self) -> Option<ScanGuard<'_>> {
        self.scanning
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| ScanGuard { ctx: self })
    }

    // ---- state ----

    pub fn state(&self) -> MutexGuard<'_, StateTracker> {
        self.state.lock()
    }

    // ---- badge ----

    /// Receiver for running-total updates.
    pub fn badge(&self) -> watch::Receiver<u64> {
        self.badge.subscribe()
    }

    pub fn publish_badge(&self, count: u64) {
        debug!("Badge count {}", count);
        self.badge.send_replace(count);
    }

    /// Answer for a stats query.
    pub fn stats(&self) -> StatsResponse {
        let settings = self.settings();
        let state = self.state();
        StatsResponse {
            enabled: self.is_enabled(),
            conversions_found: state.records().len(),
            total_conversions: state.total(),
            currencies: state.currencies(),
            settings,
        }
    }
}

/// Clears the scan flag on drop.
pub struct ScanGuard<'a> {
    ctx: &'a ConverterContext,
}

impl Drop for ScanGuard<'_> {
    fn drop(&mut self) {
        self.ctx.scanning.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> ConverterContext {
        ConverterContext::new(Settings::default(), ScannerConfig::default())
    }

    #[test]
    fn test_scan_guard_is_exclusive() {
        let ctx = context();
        let guard = ctx.begin_scan();
        assert!(guard.is_some());
        assert!(ctx.is_scanning());
        assert!(ctx.begin_scan().is_none());
        drop(guard);
        assert!(!ctx.is_scanning());
        assert!(ctx.begin_scan().is_some());
    }

    #[test]
    fn test_update_settings_reports_target_change() {
        let ctx = context();
        let patch = SettingsPatch {
            target_currency: Some("eur".to_string()),
            ..Default::default()
        };
        assert!(ctx.update_settings(patch.clone()));
        assert_eq!(ctx.target_currency(), "EUR");
        assert!(!ctx.update_settings(patch));
    }

    #[test]
    fn test_badge_publishes_latest() {
        let ctx = context();
        let rx = ctx.badge();
        ctx.publish_badge(3);
        ctx.publish_badge(4);
        assert_eq!(*rx.borrow(), 4);
    }

    #[test]
    fn test_stats_snapshot() {
        let ctx = context();
        ctx.state().record(fxlens_protocols::ConversionRecord::new(
            "EUR", 1.0, 1.1, "USD", "€1",
        ));
        let stats = ctx.stats();
        assert!(stats.enabled);
        assert_eq!(stats.conversions_found, 1);
        assert_eq!(stats.total_conversions, 1);
        assert_eq!(stats.currencies, vec!["EUR"]);
        assert_eq!(stats.settings.target_currency, "USD");
    }
}
