//! Bounded queue of subtrees awaiting a rescan.

use std::collections::HashSet;

use fxlens_core::NodeId;
use tracing::debug;

use crate::error::{ObserverError, ObserverResult};

/// Work taken from the queue at flush time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanWork {
    /// Scan each node's subtree, in arrival order.
    Nodes(Vec<NodeId>),
    /// The queue overflowed; scan the whole document instead.
    FullRescan,
}

/// Nodes waiting for the quiet window to pass, plus the reconcile flag.
#[derive(Debug)]
pub struct ScanQueue {
    nodes: Vec<NodeId>,
    seen: HashSet<NodeId>,
    limit: usize,
    collapsed: bool,
    reconcile: bool,
}

impl ScanQueue {
    pub fn new(limit: usize) -> Self {
        Self {
            nodes: Vec::new(),
            seen: HashSet::new(),
            limit: limit.max(1),
            collapsed: false,
            reconcile: false,
        }
    }

    /// Queue a node without collapsing. Returns false for duplicates or when
    /// already collapsed.
    pub fn try_push(&mut self, node: NodeId) -> ObserverResult<bool> {
        if self.collapsed || self.seen.contains(&node) {
            return Ok(false);
        }
        if self.nodes.len() >= self.limit {
            return Err(ObserverError::QueueFull { limit: self.limit });
        }
        self.seen.insert(node);
        self.nodes.push(node);
        Ok(true)
    }

    /// Queue a node; on overflow drop every queued node and fall back to a
    /// single root rescan.
    pub fn push(&mut self, node: NodeId) -> bool {
        match self.try_push(node) {
            Ok(added) => added,
            Err(e) => {
                debug!("{}, collapsing into a full rescan", e);
                self.collapse();
                false
            }
        }
    }

    fn collapse(&mut self) {
        self.nodes.clear();
        self.seen.clear();
        self.collapsed = true;
    }

    pub fn request_reconcile(&mut self) {
        self.reconcile = true;
    }

    /// Whether the queue collapsed since the last take.
    pub fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    pub fn needs_reconcile(&self) -> bool {
        self.reconcile
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Nothing to scan and nothing to reconcile.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && !self.collapsed && !self.reconcile
    }

    /// Take the reconcile flag and the scan work, leaving the queue empty.
    pub fn take(&mut self) -> (bool, Option<ScanWork>) {
        let reconcile = std::mem::take(&mut self.reconcile);
        let work = if std::mem::take(&mut self.collapsed) {
            Some(ScanWork::FullRescan)
        } else if self.nodes.is_empty() {
            None
        } else {
            self.seen.clear();
            Some(ScanWork::Nodes(std::mem::take(&mut self.nodes)))
        };
        (reconcile, work)
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.seen.clear();
        self.collapsed = false;
        self.reconcile = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fxlens_core::Document;

    fn nodes(count: usize) -> Vec<NodeId> {
        let mut doc = Document::new();
        (0..count).map(|i| doc.create_text(format!("n{i}"))).collect()
    }

    #[test]
    fn test_push_and_take_in_order() {
        let ids = nodes(3);
        let mut queue = ScanQueue::new(10);
        for id in &ids {
            assert!(queue.push(*id));
        }
        assert_eq!(queue.len(), 3);

        let (reconcile, work) = queue.take();
        assert!(!reconcile);
        assert_eq!(work, Some(ScanWork::Nodes(ids)));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_duplicates_ignored() {
        let ids = nodes(1);
        let mut queue = ScanQueue::new(10);
        assert!(queue.push(ids[0]));
        assert!(!queue.push(ids[0]));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_try_push_reports_full() {
        let ids = nodes(3);
        let mut queue = ScanQueue::new(2);
        queue.try_push(ids[0]).unwrap();
        queue.try_push(ids[1]).unwrap();
        let err = queue.try_push(ids[2]).unwrap_err();
        assert!(matches!(err, ObserverError::QueueFull { limit: 2 }));
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn test_overflow_collapses_to_full_rescan() {
        let ids = nodes(4);
        let mut queue = ScanQueue::new(2);
        queue.push(ids[0]);
        queue.push(ids[1]);
        assert!(!queue.push(ids[2]));
        assert!(queue.is_collapsed());
        assert_eq!(queue.len(), 0);
        // further nodes are absorbed by the pending full rescan
        assert!(!queue.push(ids[3]));

        let (_, work) = queue.take();
        assert_eq!(work, Some(ScanWork::FullRescan));
        assert!(!queue.is_collapsed());
        assert!(queue.push(ids[3]));
    }

    #[test]
    fn test_reconcile_only() {
        let mut queue = ScanQueue::new(4);
        queue.request_reconcile();
        assert!(!queue.is_empty());
        assert_eq!(queue.take(), (true, None));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_clear() {
        let ids = nodes(2);
        let mut queue = ScanQueue::new(1);
        queue.push(ids[0]);
        queue.push(ids[1]);
        queue.request_reconcile();
        queue.clear();
        assert!(queue.is_empty());
        assert_eq!(queue.take(), (false, None));
    }
}
