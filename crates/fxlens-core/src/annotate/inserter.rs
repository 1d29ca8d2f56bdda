//! Strategy ladder and detached-anchor recovery.

use std::collections::HashSet;

use fxlens_config::{PlacementStrategy, ScannerConfig};
use fxlens_protocols::{AnnotationError, MatchCandidate};
use tracing::debug;

use super::marker::{is_excluded_tag, is_marker};
use super::strategy::{try_place, Anchor};
use crate::document::{Document, NodeId};

/// Raw match texts that already carry a marker.
#[derive(Debug, Default, Clone)]
pub struct InsertLedger {
    inserted: HashSet<String>,
}

impl InsertLedger {
    pub fn contains(&self, raw_match_text: &str) -> bool {
        self.inserted.contains(raw_match_text)
    }

    pub fn len(&self) -> usize {
        self.inserted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inserted.is_empty()
    }

    pub fn clear(&mut self) {
        self.inserted.clear();
    }

    fn insert(&mut self, raw_match_text: &str) {
        self.inserted.insert(raw_match_text.to_string());
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted {
        marker: NodeId,
        strategy: PlacementStrategy,
        /// The original anchor was gone and a matching text node was used.
        relocated: bool,
    },
    /// This match text already has a marker.
    AlreadyAnnotated,
}

/// Places markers using an ordered strategy list.
#[derive(Debug, Clone)]
pub struct Annotator {
    strategies: Vec<PlacementStrategy>,
    search_limit: usize,
}

impl Annotator {
    pub fn new(strategies: Vec<PlacementStrategy>, search_limit: usize) -> Self {
        Self {
            strategies,
            search_limit,
        }
    }

    pub fn from_config(config: &ScannerConfig) -> Self {
        Self::new(config.strategies.clone(), config.search_limit)
    }

    pub fn strategies(&self) -> &[PlacementStrategy] {
        &self.strategies
    }

    /// Place `text` next to the match described by `candidate`.
    pub fn insert(
        &self,
        doc: &mut Document,
        ledger: &mut InsertLedger,
        anchor: Anchor,
        candidate: &MatchCandidate,
        text: &str,
    ) -> Result<InsertOutcome, AnnotationError> {
        if ledger.contains(&candidate.raw_match_text) {
            debug!("Already annotated: {}", candidate.raw_match_text);
            return Ok(InsertOutcome::AlreadyAnnotated);
        }

        let (anchor, relocated) = if doc.is_attached(anchor.node) && doc.parent(anchor.node).is_some() {
            (anchor, false)
        } else {
            debug!(
                "Anchor {} detached, searching for {:?}",
                anchor.node, candidate.raw_match_text
            );
            let node = self
                .find_text_node(doc, &candidate.raw_match_text)
                .ok_or_else(|| AnnotationError::AnchorDetached(candidate.raw_match_text.clone()))?;
            (Anchor::at(doc, node), true)
        };

        let mut last_error = None;
        for strategy in &self.strategies {
            match try_place(*strategy, doc, &anchor, candidate, text) {
                Ok(marker) => {
                    ledger.insert(&candidate.raw_match_text);
                    return Ok(InsertOutcome::Inserted {
                        marker,
                        strategy: *strategy,
                        relocated,
                    });
                }
                Err(e) => {
                    debug!("{}", e);
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| AnnotationError::StrategyFailed {
            strategy: "none".to_string(),
            reason: "no placement strategies configured".to_string(),
        }))
    }

    /// First attached text node containing `needle`, visiting at most
    /// `search_limit` nodes and skipping excluded and marked subtrees.
    pub fn find_text_node(&self, doc: &Document, needle: &str) -> Option<NodeId> {
        let mut stack = vec![doc.root()];
        let mut visited = 0;

        while let Some(id) = stack.pop() {
            if visited >= self.search_limit {
                debug!("Search limit of {} nodes reached", self.search_limit);
                return None;
            }
            visited += 1;

            if let Some(text) = doc.text(id) {
                if text.contains(needle) {
                    return Some(id);
                }
                continue;
            }
            if is_marker(doc, id) || doc.tag(id).is_some_and(is_excluded_tag) {
                continue;
            }
            stack.extend(doc.children(id).iter().rev().copied());
        }
        None
    }
}

#[cfg(test)]
#[path = "inserter_tests.rs"]
mod tests;
