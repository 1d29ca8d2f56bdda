//! Settlement timer.
//!
//! Conversions found while a page is still loading are held back; once the
//! settle delay passes they are dispatched if their anchors survived.

use std::sync::Arc;
use std::time::Duration;

use fxlens_core::Scanner;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Settle `scanner` after `delay` unless `cancel` fires first.
///
/// The task yields the number of conversions dispatched, or `None` when
/// cancelled.
pub fn spawn_settlement(
    scanner: Arc<Scanner>,
    delay: Duration,
    cancel: CancellationToken,
) -> JoinHandle<Option<usize>> {
    tokio::spawn(async move {
        tokio::select! {
            _ = cancel.cancelled() => {
                debug!("Settlement cancelled");
                None
            }
            _ = tokio::time::sleep(delay) => Some(scanner.settle()),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use fxlens_config::ScannerConfig;
    use fxlens_core::{ConverterContext, SharedDocument};
    use fxlens_protocols::{ConversionError, CurrencyConverter, Settings};

    struct Identity;

    #[async_trait]
    impl CurrencyConverter for Identity {
        async fn convert(
            &self,
            amount: f64,
            _from: &str,
            _to: &str,
            _settings: &Settings,
        ) -> Result<f64, ConversionError> {
            Ok(amount)
        }
    }

    fn scanner_with(text: &str) -> Arc<Scanner> {
        let document = SharedDocument::default();
        document.with(|doc| {
            let root = doc.root();
            doc.append_text(root, text).unwrap();
        });
        let ctx = Arc::new(ConverterContext::new(
            Settings::with_target("USD"),
            ScannerConfig::default(),
        ));
        Arc::new(Scanner::new(ctx, document, Arc::new(Identity)).unwrap())
    }

    #[tokio::test(start_paused = true)]
    async fn test_settles_after_delay() {
        let scanner = scanner_with("Sale: €15 only");
        let report = scanner.scan_document();
        assert_eq!(report.queued, 1);

        let handle = spawn_settlement(
            Arc::clone(&scanner),
            Duration::from_millis(3000),
            CancellationToken::new(),
        );
        tokio::time::sleep(Duration::from_millis(2000)).await;
        assert!(!scanner.context().state().is_settled());

        assert_eq!(handle.await.unwrap(), Some(1));
        assert!(scanner.context().state().is_settled());
        scanner.wait_idle().await;
        assert_eq!(scanner.context().state().total(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_settlement() {
        let scanner = scanner_with("Sale: €15 only");
        scanner.scan_document();

        let cancel = CancellationToken::new();
        let handle = spawn_settlement(Arc::clone(&scanner), Duration::from_secs(3), cancel.clone());
        cancel.cancel();

        assert_eq!(handle.await.unwrap(), None);
        assert!(!scanner.context().state().is_settled());
        assert_eq!(scanner.context().state().queued_count(), 1);
    }
}
