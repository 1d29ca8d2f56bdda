//! Configuration loading.
//!
//! Files are TOML. `${NAME}` references are replaced from the environment
//! before parsing, so API keys can stay out of the file.

use std::path::{Path, PathBuf};

use regex::{Captures, Regex};
use tracing::debug;

use crate::error::ConfigError;
use crate::schema::Config;

/// Default configuration location.
pub const DEFAULT_CONFIG_PATH: &str = "~/.fxlens/config.toml";

pub struct ConfigLoader;

impl ConfigLoader {
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound(path.to_path_buf())
            } else {
                ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;
        debug!("Read configuration from {}", path.display());
        Self::load_str(&content)
    }

    pub fn load_str(content: &str) -> Result<Config, ConfigError> {
        let substituted = Self::substitute_env(content)?;
        Ok(toml::from_str(&substituted)?)
    }

    /// Load from `path`, or from the default location when `path` is `None`.
    /// A missing default file yields the default configuration; a missing
    /// explicit file is an error.
    pub fn load_or_default(path: Option<&Path>) -> Result<Config, ConfigError> {
        if let Some(path) = path {
            return Self::load(path);
        }
        let default = Self::default_path();
        match Self::load(&default) {
            Err(ConfigError::NotFound(_)) => {
                debug!("No config at {}, using defaults", default.display());
                Ok(Config::default())
            }
            other => other,
        }
    }

    pub fn default_path() -> PathBuf {
        PathBuf::from(Self::expand_path(DEFAULT_CONFIG_PATH))
    }

    /// Replace every `${NAME}` with the variable's value. Fails on the first
    /// unset variable.
    fn substitute_env(content: &str) -> Result<String, ConfigError> {
        let pattern = Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}")?;
        let mut missing: Option<String> = None;

        let substituted = pattern.replace_all(content, |caps: &Captures| {
            match std::env::var(&caps[1]) {
                Ok(value) => value,
                Err(_) => {
                    missing.get_or_insert_with(|| caps[1].to_string());
                    String::new()
                }
            }
        });

        match missing {
            Some(name) => Err(ConfigError::MissingEnv(name)),
            None => Ok(substituted.into_owned()),
        }
    }

    /// Expand a leading `~` to the home directory.
    pub fn expand_path(path: &str) -> String {
        shellexpand::tilde(path).into_owned()
    }
}
