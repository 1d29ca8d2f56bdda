//! Boundary/control surface.

use std::sync::Arc;

use fxlens_protocols::{ControlRequest, ControlResponse, SettingsStore};
use tracing::{info, warn};

use crate::scanner::Scanner;

/// Handles control messages from the status UI.
pub struct ControlSurface {
    scanner: Arc<Scanner>,
    store: Option<Arc<dyn SettingsStore>>,
}

impl ControlSurface {
    pub fn new(scanner: Arc<Scanner>) -> Self {
        Self {
            scanner,
            store: None,
        }
    }

    /// Persist settings updates through `store`.
    pub fn with_store(mut self, store: Arc<dyn SettingsStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn scanner(&self) -> &Arc<Scanner> {
        &self.scanner
    }

    pub async fn handle(&self, request: ControlRequest) -> ControlResponse {
        match request {
            ControlRequest::GetStats => ControlResponse::Stats(self.scanner.context().stats()),
            ControlRequest::ToggleExtension { enabled } => {
                info!("Extension toggled: {}", enabled);
                self.scanner.set_enabled(enabled);
                ControlResponse::ok()
            }
            ControlRequest::Rescan => {
                info!("Rescanning page");
                self.scanner.rescan();
                ControlResponse::ok()
            }
            ControlRequest::UpdateSettings { settings } => {
                self.scanner.apply_settings(settings);
                if let Some(store) = &self.store {
                    let current = self.scanner.context().settings();
                    if let Err(e) = store.save(&current).await {
                        warn!("Failed to persist settings: {}", e);
                    }
                }
                ControlResponse::ok()
            }
        }
    }

    /// Handle one JSON-encoded request and encode the response.
    pub async fn handle_json(&self, line: &str) -> Result<String, serde_json::Error> {
        let request: ControlRequest = serde_json::from_str(line)?;
        let response = self.handle(request).await;
        serde_json::to_string(&response)
    }
}

#[cfg(test)]
#[path = "control_tests.rs"]
mod tests;
