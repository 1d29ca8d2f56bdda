use super::*;
use crate::annotate::{attached_markers, marker_text};
use crate::extractor::Extractor;

fn candidate(text: &str, target: &str) -> MatchCandidate {
    Extractor::new().unwrap().extract(text, target).remove(0)
}

fn page(text: &str) -> (Document, NodeId, NodeId) {
    let mut doc = Document::new();
    let root = doc.root();
    let p = doc.append_element(root, "p").unwrap();
    let t = doc.append_text(p, text).unwrap();
    (doc, p, t)
}

fn default_annotator() -> Annotator {
    Annotator::from_config(&ScannerConfig::default())
}

#[test]
fn test_append_to_original_parent() {
    let (mut doc, p, t) = page("Price: €20 today");
    let mut ledger = InsertLedger::default();
    let c = candidate("Price: €20 today", "USD");
    let anchor = Anchor::at(&doc, t);

    let outcome = default_annotator()
        .insert(&mut doc, &mut ledger, anchor, &c, &marker_text("USD", 21.5))
        .unwrap();

    match outcome {
        InsertOutcome::Inserted { strategy, relocated, .. } => {
            assert_eq!(strategy, PlacementStrategy::Append);
            assert!(!relocated);
        }
        other => panic!("unexpected outcome {:?}", other),
    }
    assert_eq!(doc.text_content(p), "Price: €20 today (≈ $21.50 USD)");
    assert!(ledger.contains("€20"));
}

#[test]
fn test_insert_is_idempotent_per_match_text() {
    let (mut doc, _, t) = page("€20");
    let mut ledger = InsertLedger::default();
    let c = candidate("€20", "USD");
    let annotator = default_annotator();
    let text = marker_text("USD", 21.5);
    let anchor = Anchor::at(&doc, t);

    annotator.insert(&mut doc, &mut ledger, anchor, &c, &text).unwrap();
    let second = annotator
        .insert(&mut doc, &mut ledger, anchor, &c, &text)
        .unwrap();

    assert_eq!(second, InsertOutcome::AlreadyAnnotated);
    assert_eq!(attached_markers(&doc).len(), 1);
}

#[test]
fn test_falls_through_to_next_sibling() {
    let (mut doc, p, t) = page("€20 now");
    let root = doc.root();
    let moved_to = doc.append_element(root, "div").unwrap();
    doc.append_child(moved_to, t).unwrap();
    let trailing = doc.append_text(moved_to, "!").unwrap();

    let mut ledger = InsertLedger::default();
    let anchor = Anchor { node: t, parent: Some(p) };
    let outcome = default_annotator()
        .insert(&mut doc, &mut ledger, anchor, &candidate("€20 now", "USD"), " (≈ $21.50 USD)")
        .unwrap();

    let InsertOutcome::Inserted { marker, strategy, .. } = outcome else {
        panic!("expected insertion");
    };
    assert_eq!(strategy, PlacementStrategy::NextSibling);
    assert_eq!(doc.children(moved_to), &[t, marker, trailing]);
}

#[test]
fn test_split_strategy() {
    let (mut doc, p, t) = page("Cost €20 each");
    let mut ledger = InsertLedger::default();
    let annotator = Annotator::new(vec![PlacementStrategy::Split], 100);
    let anchor = Anchor::at(&doc, t);

    let outcome = annotator
        .insert(&mut doc, &mut ledger, anchor, &candidate("Cost €20 each", "USD"), " (≈ $21.50 USD)")
        .unwrap();
    assert!(matches!(outcome, InsertOutcome::Inserted { strategy: PlacementStrategy::Split, .. }));

    let wrapper = doc.children(p)[0];
    let parts: Vec<_> = doc
        .children(wrapper)
        .iter()
        .map(|c| doc.text_content(*c))
        .collect();
    assert_eq!(parts, vec!["Cost €20", " (≈ $21.50 USD)", " each"]);
    assert!(!doc.is_attached(t));
}

#[test]
fn test_split_with_stale_offset_finds_match() {
    let (mut doc, p, t) = page("€20");
    doc.set_text(t, "Now only €20").unwrap();
    let mut ledger = InsertLedger::default();
    let annotator = Annotator::new(vec![PlacementStrategy::Split], 100);
    let anchor = Anchor::at(&doc, t);

    annotator
        .insert(&mut doc, &mut ledger, anchor, &candidate("€20", "USD"), "[m]")
        .unwrap();
    assert_eq!(doc.text_content(p), "Now only €20[m]");
}

#[test]
fn test_detached_anchor_is_relocated() {
    let (mut doc, _, t) = page("Deal: ₹500");
    doc.detach(t);
    let root = doc.root();
    let div = doc.append_element(root, "div").unwrap();
    doc.append_text(div, "Deal: ₹500").unwrap();

    let mut ledger = InsertLedger::default();
    let outcome = default_annotator()
        .insert(&mut doc, &mut ledger, Anchor { node: t, parent: None }, &candidate("Deal: ₹500", "USD"), "[m]")
        .unwrap();

    assert!(matches!(outcome, InsertOutcome::Inserted { relocated: true, .. }));
    assert_eq!(doc.text_content(div), "Deal: ₹500[m]");
}

#[test]
fn test_detached_anchor_without_replacement() {
    let (mut doc, p, t) = page("Deal: ₹500");
    doc.detach(p);

    let mut ledger = InsertLedger::default();
    let err = default_annotator()
        .insert(&mut doc, &mut ledger, Anchor { node: t, parent: Some(p) }, &candidate("Deal: ₹500", "USD"), "[m]")
        .unwrap_err();
    assert_eq!(err, AnnotationError::AnchorDetached("₹500".to_string()));
    assert!(ledger.is_empty());
}

#[test]
fn test_search_skips_markers_and_excluded() {
    let mut doc = Document::new();
    let root = doc.root();
    let script = doc.append_element(root, "script").unwrap();
    doc.append_text(script, "var x = '₹500';").unwrap();
    let annotator = default_annotator();
    assert_eq!(annotator.find_text_node(&doc, "₹500"), None);
}

#[test]
fn test_search_limit() {
    let (doc, _, t) = page("₹500");
    assert_eq!(Annotator::new(vec![], 3).find_text_node(&doc, "₹500"), Some(t));
    assert_eq!(Annotator::new(vec![], 2).find_text_node(&doc, "₹500"), None);
}

#[test]
fn test_no_strategies_configured() {
    let (mut doc, _, t) = page("€20");
    let mut ledger = InsertLedger::default();
    let anchor = Anchor::at(&doc, t);
    let err = Annotator::new(vec![], 10)
        .insert(&mut doc, &mut ledger, anchor, &candidate("€20", "USD"), "[m]")
        .unwrap_err();
    assert!(matches!(err, AnnotationError::StrategyFailed { .. }));
}
