//! Settings storage protocol.

use async_trait::async_trait;

use crate::error::SettingsStoreError;
use crate::settings::Settings;

/// Key-value settings backend.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Load stored settings; missing keys take their defaults.
    async fn load(&self) -> Result<Settings, SettingsStoreError>;

    /// Persist settings.
    async fn save(&self, settings: &Settings) -> Result<(), SettingsStoreError>;
}
