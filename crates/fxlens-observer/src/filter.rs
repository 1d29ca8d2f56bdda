//! Classification of mutation batches.
//!
//! Separates changes made by the page from the annotator's own markers so
//! inserting a marker never schedules another scan.

use fxlens_core::annotate::{contains_marker, in_marked_region};
use fxlens_core::{Document, MutationBatch, MutationRecord, NodeId};
use tracing::trace;

/// What one batch asks of the observer.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchEffect {
    /// Nodes whose subtrees need scanning.
    pub scan: Vec<NodeId>,
    /// A marker was removed; the running total may be stale.
    pub reconcile: bool,
}

impl BatchEffect {
    pub fn is_empty(&self) -> bool {
        self.scan.is_empty() && !self.reconcile
    }
}

/// Classify `batch` against the current state of `doc`.
pub fn classify(doc: &Document, batch: &MutationBatch) -> BatchEffect {
    let mut effect = BatchEffect::default();

    for record in &batch.records {
        match record {
            MutationRecord::ChildList { added, removed, .. } => {
                for &node in added {
                    if is_scannable(doc, node) && !contains_marker(doc, node) {
                        effect.scan.push(node);
                    } else {
                        trace!("Ignoring added node {}", node);
                    }
                }
                if removed.iter().any(|&node| contains_marker(doc, node)) {
                    effect.reconcile = true;
                }
            }
            MutationRecord::CharacterData { target } => {
                if doc.is_text(*target) && is_scannable(doc, *target) {
                    effect.scan.push(*target);
                }
            }
        }
    }
    effect
}

fn is_scannable(doc: &Document, node: NodeId) -> bool {
    doc.is_attached(node) && !in_marked_region(doc, node)
}
