//! Session wiring.
//!
//! A session owns everything needed to annotate one live document: the
//! converter context, the scanner, the change observer, the settlement
//! timer and the control surface.

use std::sync::Arc;

use fxlens_config::Config;
use fxlens_core::{ControlSurface, ConverterContext, Scanner, SharedDocument};
use fxlens_protocols::{
    ControlRequest, ControlResponse, CurrencyConverter, Settings, SettingsStore, StatsResponse,
};
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::error::ObserverResult;
use crate::metrics::MetricsSnapshot;
use crate::observer::ChangeObserver;
use crate::settlement::spawn_settlement;

/// A running annotation session over one document.
pub struct Session {
    scanner: Arc<Scanner>,
    control: ControlSurface,
    observer: ChangeObserver,
    settlement: Mutex<Option<JoinHandle<Option<usize>>>>,
    cancel: CancellationToken,
}

impl Session {
    /// Wire up and start a session.
    ///
    /// Settings come from `store` when given, otherwise from the config. The
    /// initial full scan runs before this returns; conversions it finds are
    /// held until the settle delay passes.
    pub async fn start(
        config: &Config,
        document: SharedDocument,
        converter: Arc<dyn CurrencyConverter>,
        store: Option<Arc<dyn SettingsStore>>,
    ) -> ObserverResult<Self> {
        let settings = load_settings(config, store.as_deref()).await;
        info!("Starting session (target {})", settings.target_currency);

        let ctx = Arc::new(ConverterContext::new(settings, config.scanner.clone()));
        ctx.set_enabled(config.observer.enabled_on_start);
        let scanner = Arc::new(Scanner::new(ctx, document, converter)?);

        let observer = ChangeObserver::new(Arc::clone(&scanner), config.observer.clone());
        observer.start()?;

        let mut control = ControlSurface::new(Arc::clone(&scanner));
        if let Some(store) = store {
            control = control.with_store(store);
        }

        scanner.scan_document();

        let cancel = CancellationToken::new();
        let settlement = spawn_settlement(
            Arc::clone(&scanner),
            config.observer.settle_delay(),
            cancel.child_token(),
        );

        Ok(Self {
            scanner,
            control,
            observer,
            settlement: Mutex::new(Some(settlement)),
            cancel,
        })
    }

    pub fn scanner(&self) -> &Arc<Scanner> {
        &self.scanner
    }

    pub fn document(&self) -> &SharedDocument {
        self.scanner.document()
    }

    pub fn control(&self) -> &ControlSurface {
        &self.control
    }

    /// Running-total updates (`updateBadge`).
    pub fn badge(&self) -> watch::Receiver<u64> {
        self.scanner.context().badge()
    }

    pub fn stats(&self) -> StatsResponse {
        self.scanner.context().stats()
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.observer.metrics().snapshot()
    }

    pub async fn handle(&self, request: ControlRequest) -> ControlResponse {
        self.control.handle(request).await
    }

    pub async fn handle_json(&self, line: &str) -> Result<String, serde_json::Error> {
        self.control.handle_json(line).await
    }

    /// Settle now instead of waiting for the timer.
    pub fn settle_now(&self) -> usize {
        if let Some(handle) = self.settlement.lock().take() {
            handle.abort();
        }
        self.scanner.settle()
    }

    /// Wait for in-flight conversions to finish.
    pub async fn wait_idle(&self) {
        self.scanner.wait_idle().await;
    }

    /// Stop the observer and the settlement timer, then drain conversions.
    pub async fn shutdown(&self) {
        self.cancel.cancel();
        let settlement = self.settlement.lock().take();
        if let Some(handle) = settlement {
            if let Err(e) = handle.await {
                warn!("Settlement task failed: {}", e);
            }
        }
        self.observer.stop().await;
        self.scanner.wait_idle().await;
        info!("Session stopped");
    }
}

async fn load_settings(config: &Config, store: Option<&dyn SettingsStore>) -> Settings {
    let Some(store) = store else {
        return config.settings.clone();
    };
    match store.load().await {
        Ok(settings) => settings,
        Err(e) => {
            warn!("Failed to load stored settings, using config: {}", e);
            config.settings.clone()
        }
    }
}
