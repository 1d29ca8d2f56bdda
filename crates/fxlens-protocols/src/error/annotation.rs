//! Annotation errors. Handled inside the inserter; never fatal.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AnnotationError {
    #[error("Anchor detached and no replacement text found for: {0}")]
    AnchorDetached(String),

    #[error("Placement strategy {strategy} failed: {reason}")]
    StrategyFailed { strategy: String, reason: String },

    #[error("Unexpected marker ancestry, removed marker only")]
    RevertFailure,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchor_detached_display() {
        let err = AnnotationError::AnchorDetached("€20".to_string());
        assert!(err.to_string().contains("€20"));
    }

    #[test]
    fn test_strategy_failed_display() {
        let err = AnnotationError::StrategyFailed {
            strategy: "split".to_string(),
            reason: "match not found in anchor text".to_string(),
        };
        let display = err.to_string();
        assert!(display.contains("split"));
        assert!(display.contains("match not found"));
    }
}
