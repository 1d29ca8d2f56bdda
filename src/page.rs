//! Plain-text pages for the CLI.
//!
//! Each non-blank line of the input becomes one `<p>` under the root.

use std::path::Path;

use anyhow::Context;
use fxlens_core::{Document, NodeId};

pub(crate) fn document_from_text(content: &str) -> anyhow::Result<Document> {
    let mut doc = Document::new();
    for line in content.lines().filter(|l| !l.trim().is_empty()) {
        append_paragraph(&mut doc, line)?;
    }
    doc.take_records();
    Ok(doc)
}

pub(crate) async fn load_document(path: &Path) -> anyhow::Result<Document> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    document_from_text(&content)
}

/// Append a paragraph to a live document.
pub(crate) fn append_paragraph(doc: &mut Document, text: &str) -> anyhow::Result<NodeId> {
    let root = doc.root();
    let p = doc.append_element(root, "p")?;
    doc.append_text(p, text)?;
    Ok(p)
}

/// Text of every top-level paragraph, markers included.
pub(crate) fn paragraphs(doc: &Document) -> Vec<String> {
    doc.children(doc.root())
        .iter()
        .map(|p| doc.text_content(*p))
        .collect()
}
