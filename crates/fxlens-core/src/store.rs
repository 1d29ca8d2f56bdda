//! In-memory settings store.

use async_trait::async_trait;
use fxlens_protocols::{Settings, SettingsStore, SettingsStoreError};
use parking_lot::RwLock;

/// Keeps settings for the lifetime of the process.
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    settings: RwLock<Settings>,
}

impl MemorySettingsStore {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings: RwLock::new(settings),
        }
    }
}

#[async_trait]
impl SettingsStore for MemorySettingsStore {
    async fn load(&self) -> Result<Settings, SettingsStoreError> {
        Ok(self.settings.read().clone())
    }

    async fn save(&self, settings: &Settings) -> Result<(), SettingsStoreError> {
        *self.settings.write() = settings.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_round_trip() {
        let store = MemorySettingsStore::default();
        assert_eq!(store.load().await.unwrap().target_currency, "USD");

        store.save(&Settings::with_target("JPY")).await.unwrap();
        assert_eq!(store.load().await.unwrap().target_currency, "JPY");
    }
}
