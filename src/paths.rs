//! Well-known fxlens paths.

use std::path::PathBuf;

/// Get the .fxlens directory path.
pub(crate) fn fxlens_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".fxlens"))
        .unwrap_or_else(|| PathBuf::from(".fxlens"))
}

/// Default directory for rotated log files.
pub(crate) fn default_log_dir() -> PathBuf {
    fxlens_dir().join("logs")
}
