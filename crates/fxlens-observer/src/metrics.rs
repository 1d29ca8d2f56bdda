//! Observer metrics collection.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Observer counters.
#[derive(Debug, Default)]
pub struct ObserverMetrics {
    /// Mutation batches received.
    pub batches_seen: AtomicU64,

    /// Batches dropped because scanning was disabled.
    pub batches_ignored: AtomicU64,

    /// Nodes accepted into the scan queue.
    pub nodes_queued: AtomicU64,

    /// Flushes that ran the scan pipeline.
    pub flushes: AtomicU64,

    /// Flushes postponed because a full scan was running.
    pub deferred_flushes: AtomicU64,

    /// Times the queue collapsed into a root rescan.
    pub overflows: AtomicU64,

    start_time: parking_lot::RwLock<Option<Instant>>,
}

impl ObserverMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the start of the observer.
    pub fn mark_start(&self) {
        *self.start_time.write() = Some(Instant::now());
    }

    pub fn uptime_secs(&self) -> u64 {
        self.start_time
            .read()
            .map(|t| t.elapsed().as_secs())
            .unwrap_or(0)
    }

    pub fn record_batch(&self) {
        self.batches_seen.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_ignored(&self) {
        self.batches_ignored.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_queued(&self, count: u64) {
        self.nodes_queued.fetch_add(count, Ordering::Relaxed);
    }

    pub fn record_flush(&self) {
        self.flushes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_deferred(&self) {
        self.deferred_flushes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_overflow(&self) {
        self.overflows.fetch_add(1, Ordering::Relaxed);
    }

    /// Get a snapshot of the metrics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            timestamp: Utc::now(),
            uptime_secs: self.uptime_secs(),
            batches_seen: self.batches_seen.load(Ordering::Relaxed),
            batches_ignored: self.batches_ignored.load(Ordering::Relaxed),
            nodes_queued: self.nodes_queued.load(Ordering::Relaxed),
            flushes: self.flushes.load(Ordering::Relaxed),
            deferred_flushes: self.deferred_flushes.load(Ordering::Relaxed),
            overflows: self.overflows.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of metrics at a point in time.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    pub timestamp: DateTime<Utc>,
    pub uptime_secs: u64,
    pub batches_seen: u64,
    pub batches_ignored: u64,
    pub nodes_queued: u64,
    pub flushes: u64,
    pub deferred_flushes: u64,
    pub overflows: u64,
}

impl MetricsSnapshot {
    /// Share of received batches that were acted on.
    pub fn accepted_ratio(&self) -> f64 {
        if self.batches_seen == 0 {
            return 0.0;
        }
        (self.batches_seen - self.batches_ignored) as f64 / self.batches_seen as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_new() {
        let metrics = ObserverMetrics::new();
        assert_eq!(metrics.batches_seen.load(Ordering::Relaxed), 0);
        assert_eq!(metrics.uptime_secs(), 0);
    }

    #[test]
    fn test_snapshot() {
        let metrics = ObserverMetrics::new();
        metrics.record_batch();
        metrics.record_batch();
        metrics.record_ignored();
        metrics.record_queued(3);
        metrics.record_flush();
        metrics.record_deferred();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.batches_seen, 2);
        assert_eq!(snapshot.batches_ignored, 1);
        assert_eq!(snapshot.nodes_queued, 3);
        assert_eq!(snapshot.flushes, 1);
        assert_eq!(snapshot.deferred_flushes, 1);
        assert_eq!(snapshot.overflows, 0);
        assert_eq!(snapshot.accepted_ratio(), 0.5);
    }

    #[test]
    fn test_zero_division() {
        let snapshot = ObserverMetrics::new().snapshot();
        assert_eq!(snapshot.accepted_ratio(), 0.0);
    }

    #[test]
    fn test_snapshot_serializes_camel_case() {
        let json = serde_json::to_value(ObserverMetrics::new().snapshot()).unwrap();
        assert!(json.get("deferredFlushes").is_some());
        assert!(json.get("batchesSeen").is_some());
    }
}
