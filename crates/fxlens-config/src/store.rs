//! TOML-file backed settings store.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use fxlens_protocols::{Settings, SettingsStore, SettingsStoreError};
use tracing::debug;

use crate::loader::ConfigLoader;

/// Default settings file location.
pub const DEFAULT_SETTINGS_PATH: &str = "~/.fxlens/settings.toml";

/// Persists [`Settings`] as a small TOML document.
#[derive(Debug, Clone)]
pub struct TomlSettingsStore {
    path: PathBuf,
    fallback: Settings,
}

impl TomlSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            fallback: Settings::default(),
        }
    }

    /// Settings returned while nothing has been saved yet.
    pub fn with_fallback(mut self, settings: Settings) -> Self {
        self.fallback = settings;
        self
    }

    /// Store at `~/.fxlens/settings.toml`.
    pub fn default_location() -> Self {
        Self::new(ConfigLoader::expand_path(DEFAULT_SETTINGS_PATH))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SettingsStore for TomlSettingsStore {
    async fn load(&self) -> Result<Settings, SettingsStoreError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Settings file {} missing, using defaults", self.path.display());
                return Ok(self.fallback.clone());
            }
            Err(e) => return Err(SettingsStoreError::StorageError(e.to_string())),
        };

        toml::from_str(&content).map_err(|e| SettingsStoreError::SerializationError(e.to_string()))
    }

    async fn save(&self, settings: &Settings) -> Result<(), SettingsStoreError> {
        let content = toml::to_string_pretty(settings)
            .map_err(|e| SettingsStoreError::SerializationError(e.to_string()))?;

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| SettingsStoreError::StorageError(e.to_string()))?;
        }

        tokio::fs::write(&self.path, content)
            .await
            .map_err(|e| SettingsStoreError::StorageError(e.to_string()))?;
        debug!("Saved settings to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_load_missing_returns_default() {
        let dir = TempDir::new().unwrap();
        let store = TomlSettingsStore::new(dir.path().join("settings.toml"));
        let settings = store.load().await.unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[tokio::test]
    async fn test_load_missing_returns_fallback() {
        let dir = TempDir::new().unwrap();
        let store = TomlSettingsStore::new(dir.path().join("settings.toml"))
            .with_fallback(Settings::with_target("GBP"));
        assert_eq!(store.load().await.unwrap().target_currency, "GBP");
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let store = TomlSettingsStore::new(dir.path().join("nested").join("settings.toml"));

        let mut settings = Settings::with_target("eur");
        settings.freecurrency_api_key = Some("fc-key".to_string());
        store.save(&settings).await.unwrap();

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded.target_currency, "EUR");
        assert_eq!(loaded.freecurrency_key(), Some("fc-key"));
    }

    #[tokio::test]
    async fn test_load_corrupt_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "targetCurrency = [").unwrap();
        let store = TomlSettingsStore::new(path);
        assert!(matches!(
            store.load().await,
            Err(SettingsStoreError::SerializationError(_))
        ));
    }
}
