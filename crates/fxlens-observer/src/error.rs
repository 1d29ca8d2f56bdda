//! Error types for the change observer.

use fxlens_core::CoreError;
use thiserror::Error;

/// Errors that can occur in the observer or while wiring a session.
#[derive(Debug, Error)]
pub enum ObserverError {
    /// The scan queue reached its limit.
    #[error("Scan queue is full ({limit} nodes)")]
    QueueFull { limit: usize },

    /// The observer is already running.
    #[error("Observer is already running")]
    AlreadyRunning,

    /// The mutation channel closed.
    #[error("Mutation channel closed")]
    ChannelClosed,

    /// Building the scan pipeline failed.
    #[error("Core error: {0}")]
    Core(#[from] CoreError),
}

/// Result type for observer operations.
pub type ObserverResult<T> = Result<T, ObserverError>;
