//! Dedup and scan state.

use std::collections::{HashMap, HashSet};

use fxlens_protocols::{ConversionRecord, DedupKey, MatchCandidate};

use crate::annotate::{Anchor, InsertLedger};
use crate::document::NodeId;

/// A conversion admitted before the page settled.
#[derive(Debug, Clone)]
pub struct QueuedConversion {
    pub anchor: Anchor,
    pub candidate: MatchCandidate,
}

/// Process-wide bookkeeping for one document.
///
/// Guarantees at most one in-flight conversion per dedup key. The `epoch`
/// advances on every [`reset`](Self::reset); responses carrying an older
/// epoch belong to a discarded pass.
#[derive(Debug, Default)]
pub struct StateTracker {
    pending: HashSet<DedupKey>,
    processed_nodes: HashMap<NodeId, String>,
    processed_texts: HashSet<String>,
    settled: bool,
    queue: Vec<QueuedConversion>,
    records: Vec<ConversionRecord>,
    total: u64,
    ledger: InsertLedger,
    epoch: u64,
}

impl StateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    // ---- pending conversions ----

    /// Admit a candidate unless its key is already in flight. The key is
    /// recorded before any asynchronous work starts.
    pub fn admit(&mut self, candidate: &MatchCandidate) -> bool {
        self.pending.insert(candidate.dedup_key.clone())
    }

    /// Drop a key on its terminal response. Returns whether it was tracked.
    pub fn release(&mut self, key: &DedupKey) -> bool {
        self.pending.remove(key)
    }

    pub fn is_pending(&self, key: &DedupKey) -> bool {
        self.pending.contains(key)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    // ---- processed segments ----

    /// Whether this node was scanned with this exact text, or the text was
    /// already converted elsewhere.
    pub fn is_segment_processed(&self, node: NodeId, text: &str) -> bool {
        self.processed_nodes.get(&node).is_some_and(|t| t == text)
            || self.processed_texts.contains(text)
    }

    /// The node is always cached; the text only when it yielded admitted
    /// candidates.
    pub fn mark_segment_processed(&mut self, node: NodeId, text: &str, yielded: bool) {
        self.processed_nodes.insert(node, text.to_string());
        if yielded {
            self.processed_texts.insert(text.to_string());
        }
    }

    // ---- settlement ----

    pub fn is_settled(&self) -> bool {
        self.settled
    }

    pub fn enqueue(&mut self, conversion: QueuedConversion) {
        self.queue.push(conversion);
    }

    pub fn queued_count(&self) -> usize {
        self.queue.len()
    }

    /// Mark the page settled and hand back everything queued so far.
    pub fn settle(&mut self) -> Vec<QueuedConversion> {
        self.settled = true;
        std::mem::take(&mut self.queue)
    }

    // ---- records ----

    /// Append a record and return the new running total.
    pub fn record(&mut self, record: ConversionRecord) -> u64 {
        self.records.push(record);
        self.total += 1;
        self.total
    }

    pub fn records(&self) -> &[ConversionRecord] {
        &self.records
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    /// Distinct source currencies in first-seen order.
    pub fn currencies(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.records
            .iter()
            .filter(|r| seen.insert(r.from_currency.as_str()))
            .map(|r| r.from_currency.clone())
            .collect()
    }

    /// Lower the total to `attached` markers if it exceeds it.
    pub fn reconcile(&mut self, attached: u64) -> Option<u64> {
        if attached < self.total {
            self.total = attached;
            Some(attached)
        } else {
            None
        }
    }

    /// Forget records, the total and the insertion ledger.
    pub fn clear_conversions(&mut self) {
        self.records.clear();
        self.total = 0;
        self.ledger.clear();
    }

    pub fn ledger_mut(&mut self) -> &mut InsertLedger {
        &mut self.ledger
    }

    // ---- lifecycle ----

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Clear pending keys, processed caches and undispatched conversions.
    pub fn reset(&mut self) {
        self.pending.clear();
        self.processed_nodes.clear();
        self.processed_texts.clear();
        self.queue.clear();
        self.epoch += 1;
    }
}

#[cfg(test)]
#[path = "tracker_tests.rs"]
mod tests;
