//! Annotation inserter.
//!
//! Places converted-value markers next to matched text through an ordered
//! ladder of placement strategies, and structurally reverts every marker.

mod inserter;
mod marker;
mod revert;
mod strategy;

pub use inserter::{Annotator, InsertLedger, InsertOutcome};
pub use marker::{
    attached_markers, contains_marker, holds_marker, in_marked_region, is_excluded_tag, is_marker,
    is_wrapper, marker_text, EXCLUDED_TAGS, MARKER_ATTR, MARKER_CLASS, WRAPPER_ATTR,
};
pub use revert::revert_all;
pub use strategy::Anchor;
