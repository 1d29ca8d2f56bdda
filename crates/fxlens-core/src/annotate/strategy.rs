//! Placement strategies.
//!
//! Each strategy either places the marker and returns it, or fails without
//! touching the document.

use fxlens_config::PlacementStrategy;
use fxlens_protocols::{AnnotationError, MatchCandidate};

use super::marker::{create_marker, create_wrapper};
use crate::document::{Document, NodeId};

/// Text node a match was found in, plus the parent it had at scan time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anchor {
    pub node: NodeId,
    pub parent: Option<NodeId>,
}

impl Anchor {
    /// Anchor `node` at its current parent.
    pub fn at(doc: &Document, node: NodeId) -> Self {
        Self {
            node,
            parent: doc.parent(node),
        }
    }
}

pub(crate) fn try_place(
    strategy: PlacementStrategy,
    doc: &mut Document,
    anchor: &Anchor,
    candidate: &MatchCandidate,
    text: &str,
) -> Result<NodeId, AnnotationError> {
    match strategy {
        PlacementStrategy::Append => append(doc, anchor, text),
        PlacementStrategy::NextSibling => next_sibling(doc, anchor, text),
        PlacementStrategy::Split => split(doc, anchor, candidate, text),
    }
}

fn failed(strategy: PlacementStrategy, reason: impl Into<String>) -> AnnotationError {
    AnnotationError::StrategyFailed {
        strategy: strategy.name().to_string(),
        reason: reason.into(),
    }
}

fn structural(strategy: PlacementStrategy) -> impl Fn(crate::error::DocumentError) -> AnnotationError {
    move |e| failed(strategy, e.to_string())
}

/// Append to the original parent while the anchor is still beneath it.
fn append(doc: &mut Document, anchor: &Anchor, text: &str) -> Result<NodeId, AnnotationError> {
    let strategy = PlacementStrategy::Append;
    let parent = anchor.parent.ok_or_else(|| failed(strategy, "anchor had no parent"))?;

    if !doc.is_attached(anchor.node) || !doc.contains(parent, anchor.node) {
        return Err(failed(strategy, "anchor left its original parent"));
    }
    if matches!(doc.tag(parent), Some("script" | "style")) {
        return Err(failed(strategy, "parent is a script or style element"));
    }

    let marker = create_marker(doc, text).map_err(structural(strategy))?;
    doc.append_child(parent, marker).map_err(structural(strategy))?;
    Ok(marker)
}

/// Insert right after the anchor in its current parent.
fn next_sibling(doc: &mut Document, anchor: &Anchor, text: &str) -> Result<NodeId, AnnotationError> {
    let strategy = PlacementStrategy::NextSibling;
    if doc.parent(anchor.node).is_none() || !doc.is_attached(anchor.node) {
        return Err(failed(strategy, "anchor is detached"));
    }

    let marker = create_marker(doc, text).map_err(structural(strategy))?;
    doc.insert_after(anchor.node, marker).map_err(structural(strategy))?;
    Ok(marker)
}

/// Replace the anchor with `[before, marker, after]` inside a wrapper.
fn split(
    doc: &mut Document,
    anchor: &Anchor,
    candidate: &MatchCandidate,
    text: &str,
) -> Result<NodeId, AnnotationError> {
    let strategy = PlacementStrategy::Split;
    if doc.parent(anchor.node).is_none() || !doc.is_attached(anchor.node) {
        return Err(failed(strategy, "anchor is detached"));
    }
    let content = doc
        .text(anchor.node)
        .ok_or_else(|| failed(strategy, "anchor is not a text node"))?
        .to_string();

    let raw = candidate.raw_match_text.as_str();
    let start = if content
        .get(candidate.offset..)
        .is_some_and(|rest| rest.starts_with(raw))
    {
        candidate.offset
    } else {
        content
            .find(raw)
            .ok_or_else(|| failed(strategy, "match not found in anchor text"))?
    };
    let (before, after) = content.split_at(start + raw.len());

    let wrapper = create_wrapper(doc).map_err(structural(strategy))?;
    let marker = create_marker(doc, text).map_err(structural(strategy))?;
    doc.append_text(wrapper, before).map_err(structural(strategy))?;
    doc.append_child(wrapper, marker).map_err(structural(strategy))?;
    if !after.is_empty() {
        doc.append_text(wrapper, after).map_err(structural(strategy))?;
    }
    doc.replace(anchor.node, wrapper).map_err(structural(strategy))?;
    Ok(marker)
}
