//! Configuration errors.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("No configuration file at {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Configuration references ${{{0}}} but it is not set")]
    MissingEnv(String),

    #[error("Bad substitution pattern: {0}")]
    Pattern(#[from] regex::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_shows_path() {
        let err = ConfigError::NotFound(PathBuf::from("/etc/fxlens.toml"));
        assert_eq!(err.to_string(), "No configuration file at /etc/fxlens.toml");
    }

    #[test]
    fn test_missing_env_names_variable() {
        let err = ConfigError::MissingEnv("FREECURRENCY_API_KEY".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration references ${FREECURRENCY_API_KEY} but it is not set"
        );
    }

    #[test]
    fn test_read_error_keeps_source() {
        let err = ConfigError::Read {
            path: PathBuf::from("config.toml"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.to_string().contains("config.toml"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
