//! Change observer.
//!
//! Subscribes to the document's mutation batches, queues the subtrees the
//! page changed, and scans them once the document has been quiet for the
//! configured window.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use fxlens_config::ObserverConfig;
use fxlens_core::{MutationBatch, ScanReport, Scanner};
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::{ObserverError, ObserverResult};
use crate::filter::classify;
use crate::metrics::ObserverMetrics;
use crate::queue::{ScanQueue, ScanWork};

/// Result of one flush attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushOutcome {
    /// Nothing was queued.
    Idle,
    /// A full scan held the scan flag; the work stays queued.
    Deferred,
    /// Queued work was scanned.
    Scanned(ScanReport),
}

/// Handle to the running worker.
struct WorkerHandle {
    cancel: CancellationToken,
    join: JoinHandle<()>,
}

/// Watches one document for page-driven changes.
pub struct ChangeObserver {
    scanner: Arc<Scanner>,
    config: ObserverConfig,
    metrics: Arc<ObserverMetrics>,
    running: AtomicBool,
    worker: Mutex<Option<WorkerHandle>>,
}

impl ChangeObserver {
    pub fn new(scanner: Arc<Scanner>, config: ObserverConfig) -> Self {
        Self {
            scanner,
            config,
            metrics: Arc::new(ObserverMetrics::new()),
            running: AtomicBool::new(false),
            worker: Mutex::new(None),
        }
    }

    pub fn metrics(&self) -> &Arc<ObserverMetrics> {
        &self.metrics
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Subscribe to the document and spawn the debounce worker.
    pub fn start(&self) -> ObserverResult<()> {
        if self
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(ObserverError::AlreadyRunning);
        }

        let batches = self.scanner.document().subscribe();
        let cancel = CancellationToken::new();
        let worker = ObserverWorker {
            scanner: Arc::clone(&self.scanner),
            metrics: Arc::clone(&self.metrics),
            queue: ScanQueue::new(self.config.max_pending_nodes),
            quiet_window: self.config.quiet_window(),
        };
        let join = tokio::spawn(worker.run(batches, cancel.clone()));

        *self.worker.lock() = Some(WorkerHandle { cancel, join });
        self.metrics.mark_start();
        info!(
            "Change observer started (quiet window {:?})",
            self.config.quiet_window()
        );
        Ok(())
    }

    /// Stop the worker and wait for it to exit. Queued nodes are dropped.
    pub async fn stop(&self) {
        let handle = self.worker.lock().take();
        if let Some(handle) = handle {
            handle.cancel.cancel();
            if let Err(e) = handle.join.await {
                warn!("Observer worker ended abnormally: {}", e);
            }
        }
        self.running.store(false, Ordering::SeqCst);
        info!("Change observer stopped");
    }
}

/// State owned by the worker task.
struct ObserverWorker {
    scanner: Arc<Scanner>,
    metrics: Arc<ObserverMetrics>,
    queue: ScanQueue,
    quiet_window: std::time::Duration,
}

impl ObserverWorker {
    async fn run(
        mut self,
        mut batches: mpsc::UnboundedReceiver<MutationBatch>,
        cancel: CancellationToken,
    ) {
        let mut deadline: Option<Instant> = None;

        loop {
            let quiet = async move {
                match deadline {
                    Some(at) => tokio::time::sleep_until(at).await,
                    None => std::future::pending().await,
                }
            };

            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!("Observer worker shutting down");
                    break;
                }
                batch = batches.recv() => {
                    let Some(batch) = batch else {
                        warn!("{}", ObserverError::ChannelClosed);
                        break;
                    };
                    if self.ingest(&batch) {
                        deadline = Some(Instant::now() + self.quiet_window);
                    }
                }
                _ = quiet => {
                    deadline = match self.flush() {
                        FlushOutcome::Deferred => Some(Instant::now() + self.quiet_window),
                        _ => None,
                    };
                }
            }
        }
    }

    /// Queue what the batch asks for. Returns whether anything was queued.
    fn ingest(&mut self, batch: &MutationBatch) -> bool {
        self.metrics.record_batch();
        if !self.scanner.context().is_enabled() {
            self.metrics.record_ignored();
            return false;
        }

        let effect = self.scanner.document().read(|doc| classify(doc, batch));
        if effect.is_empty() {
            return false;
        }

        if effect.reconcile {
            self.queue.request_reconcile();
        }
        let was_collapsed = self.queue.is_collapsed();
        let mut queued = 0;
        for node in effect.scan {
            if self.queue.push(node) {
                queued += 1;
            }
        }
        if !was_collapsed && self.queue.is_collapsed() {
            self.metrics.record_overflow();
        }
        self.metrics.record_queued(queued);
        true
    }

    fn flush(&mut self) -> FlushOutcome {
        if self.queue.is_empty() {
            return FlushOutcome::Idle;
        }
        if self.scanner.context().is_scanning() {
            debug!("Full scan in progress, deferring flush");
            self.metrics.record_deferred();
            return FlushOutcome::Deferred;
        }

        self.metrics.record_flush();
        let (reconcile, work) = self.queue.take();
        if reconcile {
            self.scanner.reconcile();
        }

        let report = match work {
            Some(ScanWork::FullRescan) => {
                debug!("Scan queue overflowed, scanning the whole document");
                self.scanner.scan_document()
            }
            Some(ScanWork::Nodes(nodes)) => {
                let mut total = ScanReport::default();
                for node in nodes {
                    let report = self.scanner.scan_node(node);
                    total.segments += report.segments;
                    total.admitted += report.admitted;
                    total.dispatched += report.dispatched;
                    total.queued += report.queued;
                }
                total
            }
            None => ScanReport::default(),
        };
        if report.admitted > 0 {
            debug!(
                "Observer flush admitted {} new matches ({} dispatched)",
                report.admitted, report.dispatched
            );
        }
        FlushOutcome::Scanned(report)
    }
}

#[cfg(test)]
#[path = "observer_tests.rs"]
mod tests;
