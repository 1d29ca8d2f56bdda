//! Structural removal of every marker.

use tracing::debug;

use super::marker::{attached_markers, is_marker, is_wrapper};
use crate::document::{Document, NodeId};
use crate::error::DocumentResult;

/// Remove every attached marker and collapse split wrappers back into plain
/// text. Returns the number of markers removed.
pub fn revert_all(doc: &mut Document) -> usize {
    let markers = attached_markers(doc);
    let mut removed = 0;

    for marker in markers {
        if !doc.is_attached(marker) {
            // Went away with a wrapper collapsed earlier in this pass.
            continue;
        }
        match doc.parent(marker) {
            Some(parent) if is_wrapper(doc, parent) => match collapse_wrapper(doc, parent) {
                Ok(count) => removed += count,
                Err(e) => {
                    debug!("Revert failure at {}: {}, removing marker only", parent, e);
                    doc.detach(marker);
                    removed += 1;
                }
            },
            _ => {
                doc.detach(marker);
                removed += 1;
            }
        }
    }

    // Wrappers whose marker was removed by someone else still hold split text.
    let orphans: Vec<NodeId> = doc
        .descendants(doc.root())
        .into_iter()
        .filter(|n| is_wrapper(doc, *n))
        .collect();
    for wrapper in orphans {
        if doc.is_attached(wrapper) {
            if let Err(e) = collapse_wrapper(doc, wrapper) {
                debug!("Could not collapse wrapper {}: {}", wrapper, e);
            }
        }
    }

    debug!("Reverted {} markers", removed);
    removed
}

/// Replace a wrapper with one text node holding its non-marker text.
/// Returns the number of markers it held.
fn collapse_wrapper(doc: &mut Document, wrapper: NodeId) -> DocumentResult<usize> {
    let mut text = String::new();
    let mut markers = 0;
    let mut stack = vec![wrapper];
    while let Some(id) = stack.pop() {
        if is_marker(doc, id) {
            markers += 1;
            continue;
        }
        if let Some(t) = doc.text(id) {
            text.push_str(t);
        }
        stack.extend(doc.children(id).iter().rev().copied());
    }

    let restored = doc.create_text(text);
    doc.replace(wrapper, restored)?;
    Ok(markers)
}

#[cfg(test)]
#[path = "revert_tests.rs"]
mod tests;
