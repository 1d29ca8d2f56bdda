//! Marker and wrapper nodes.

use crate::currency;
use crate::document::{Document, NodeId};
use crate::error::DocumentResult;

/// Class carried by every marker.
pub const MARKER_CLASS: &str = "currency-converter-result";

/// Attribute carried by every marker (value `"true"`).
pub const MARKER_ATTR: &str = "data-currency-converter";

/// Attribute carried by synthetic split wrappers (value `"true"`).
pub const WRAPPER_ATTR: &str = "data-currency-converter-wrapper";

/// Elements whose content is never scanned.
pub const EXCLUDED_TAGS: &[&str] = &["script", "style", "noscript", "textarea", "input", "svg"];

pub fn is_excluded_tag(tag: &str) -> bool {
    EXCLUDED_TAGS.iter().any(|t| t.eq_ignore_ascii_case(tag))
}

/// Text shown inside a marker, e.g. ` (≈ €18.40 EUR)`.
pub fn marker_text(target: &str, converted: f64) -> String {
    format!(" (≈ {}{:.2} {})", currency::symbol_for(target), converted, target)
}

pub fn is_marker(doc: &Document, id: NodeId) -> bool {
    doc.has_class(id, MARKER_CLASS) || doc.attr(id, MARKER_ATTR).is_some()
}

pub fn is_wrapper(doc: &Document, id: NodeId) -> bool {
    doc.attr(id, WRAPPER_ATTR) == Some("true")
}

/// Whether `id` is a marker or has one beneath it.
pub fn contains_marker(doc: &Document, id: NodeId) -> bool {
    doc.descendants(id).into_iter().any(|n| is_marker(doc, n))
}

/// Whether a marker sits directly under `id`. Every placement strategy
/// leaves its marker as a sibling of the matched text.
pub fn holds_marker(doc: &Document, id: NodeId) -> bool {
    doc.children(id).iter().any(|&c| is_marker(doc, c))
}

/// Whether `id` is a marker or lies inside one.
pub fn in_marked_region(doc: &Document, id: NodeId) -> bool {
    is_marker(doc, id) || doc.ancestors(id).any(|a| is_marker(doc, a))
}

/// Every marker reachable from the root, in document order.
pub fn attached_markers(doc: &Document) -> Vec<NodeId> {
    doc.descendants(doc.root())
        .into_iter()
        .filter(|n| is_marker(doc, *n))
        .collect()
}

/// Create a detached marker holding `text`.
pub(crate) fn create_marker(doc: &mut Document, text: &str) -> DocumentResult<NodeId> {
    let marker = doc.create_element("span");
    doc.set_attr(marker, "class", MARKER_CLASS)?;
    doc.set_attr(marker, MARKER_ATTR, "true")?;
    doc.append_text(marker, text)?;
    Ok(marker)
}

/// Create a detached split wrapper.
pub(crate) fn create_wrapper(doc: &mut Document) -> DocumentResult<NodeId> {
    let wrapper = doc.create_element("span");
    doc.set_attr(wrapper, WRAPPER_ATTR, "true")?;
    Ok(wrapper)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_text_format() {
        assert_eq!(marker_text("EUR", 18.4), " (≈ €18.40 EUR)");
        assert_eq!(marker_text("USD", 1234.567), " (≈ $1234.57 USD)");
    }

    #[test]
    fn test_marker_text_without_symbol() {
        assert_eq!(marker_text("CHF", 2.0), " (≈ 2.00 CHF)");
    }

    #[test]
    fn test_marker_detection() {
        let mut doc = Document::new();
        let root = doc.root();
        let p = doc.append_element(root, "p").unwrap();
        let marker = create_marker(&mut doc, " (≈ $1.00 USD)").unwrap();
        doc.append_child(p, marker).unwrap();

        assert!(is_marker(&doc, marker));
        assert!(!is_marker(&doc, p));
        assert!(contains_marker(&doc, p));
        assert!(holds_marker(&doc, p));
        assert!(contains_marker(&doc, root));
        assert!(!holds_marker(&doc, root));
        let inner = doc.children(marker)[0];
        assert!(in_marked_region(&doc, inner));
        assert!(!in_marked_region(&doc, p));
        assert_eq!(attached_markers(&doc), vec![marker]);
    }

    #[test]
    fn test_excluded_tags() {
        assert!(is_excluded_tag("script"));
        assert!(is_excluded_tag("SVG"));
        assert!(!is_excluded_tag("p"));
    }
}
