//! Arena-backed document tree.

use super::mutation::MutationRecord;
use super::node::{Element, NodeData, NodeId, NodeKind};
use crate::error::{DocumentError, DocumentResult};

/// A mutable document rooted at a `body` element.
///
/// Nodes are created detached and become part of the document once inserted
/// under an attached node. Removed nodes stay in the arena, detached, and are
/// never freed: anchors and the scan cache keep their ids across awaits, so a
/// slot is never reused. Memory grows with every node a page creates.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<NodeData>,
    root: NodeId,
    records: Vec<MutationRecord>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            nodes: vec![NodeData::new(NodeKind::Element(Element::new("body")))],
            root: NodeId(0),
            records: Vec::new(),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    // ---- creation ----

    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(NodeKind::Element(Element::new(tag)))
    }

    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.push(NodeKind::Text(text.into()))
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData::new(kind));
        id
    }

    /// Create an element and append it to `parent`.
    pub fn append_element(&mut self, parent: NodeId, tag: &str) -> DocumentResult<NodeId> {
        let id = self.create_element(tag);
        self.append_child(parent, id)?;
        Ok(id)
    }

    /// Create a text node and append it to `parent`.
    pub fn append_text(
        &mut self,
        parent: NodeId,
        text: impl Into<String>,
    ) -> DocumentResult<NodeId> {
        let id = self.create_text(text);
        self.append_child(parent, id)?;
        Ok(id)
    }

    // ---- queries ----

    fn node(&self, id: NodeId) -> DocumentResult<&NodeData> {
        self.nodes.get(id.0).ok_or(DocumentError::NodeNotFound(id))
    }

    fn node_mut(&mut self, id: NodeId) -> DocumentResult<&mut NodeData> {
        self.nodes.get_mut(id.0).ok_or(DocumentError::NodeNotFound(id))
    }

    pub fn kind(&self, id: NodeId) -> Option<&NodeKind> {
        self.nodes.get(id.0).map(|n| &n.kind)
    }

    pub fn is_text(&self, id: NodeId) -> bool {
        matches!(self.kind(id), Some(NodeKind::Text(_)))
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        matches!(self.kind(id), Some(NodeKind::Element(_)))
    }

    /// Tag name of an element.
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        match self.kind(id) {
            Some(NodeKind::Element(el)) => Some(el.tag.as_str()),
            _ => None,
        }
    }

    /// Contents of a text node.
    pub fn text(&self, id: NodeId) -> Option<&str> {
        match self.kind(id) {
            Some(NodeKind::Text(text)) => Some(text.as_str()),
            _ => None,
        }
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        match self.kind(id) {
            Some(NodeKind::Element(el)) => el.attrs.get(name).map(String::as_str),
            _ => None,
        }
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.attr(id, "class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id.0).and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(id.0).map_or(&[], |n| n.children.as_slice())
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let siblings = self.children(parent);
        let pos = siblings.iter().position(|c| *c == id)?;
        siblings.get(pos + 1).copied()
    }

    /// Ancestors of `id`, nearest first, excluding `id`.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |n| self.parent(*n))
    }

    /// Whether `id` is the root or has the root as an ancestor.
    pub fn is_attached(&self, id: NodeId) -> bool {
        id == self.root || self.ancestors(id).any(|a| a == self.root)
    }

    /// Whether `node` is `ancestor` or lies beneath it.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        node == ancestor || self.ancestors(node).any(|a| a == ancestor)
    }

    /// `id` and all of its descendants in document order.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.children(current).iter().rev().copied());
        }
        out
    }

    /// Concatenated text of `id` and its descendants.
    pub fn text_content(&self, id: NodeId) -> String {
        self.descendants(id)
            .into_iter()
            .filter_map(|n| self.text(n))
            .collect()
    }

    /// Number of nodes ever created.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // ---- mutation ----

    pub fn set_attr(&mut self, id: NodeId, name: &str, value: impl Into<String>) -> DocumentResult<()> {
        match &mut self.node_mut(id)?.kind {
            NodeKind::Element(el) => {
                el.attrs.insert(name.to_string(), value.into());
                Ok(())
            }
            NodeKind::Text(_) => Err(DocumentError::NotAnElement(id)),
        }
    }

    /// Replace the contents of a text node.
    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) -> DocumentResult<()> {
        match &mut self.node_mut(id)?.kind {
            NodeKind::Text(current) => {
                *current = text.into();
                self.records.push(MutationRecord::CharacterData { target: id });
                Ok(())
            }
            NodeKind::Element(_) => Err(DocumentError::NotText(id)),
        }
    }

    /// Append `child` as the last child of `parent`, moving it if needed.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DocumentResult<()> {
        self.insert_before(parent, child, None)
    }

    /// Insert `child` under `parent` before `reference`, or last when
    /// `reference` is `None` or not a child of `parent`.
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> DocumentResult<()> {
        self.check_insert(parent, child)?;
        self.detach(child);

        let siblings = &mut self.node_mut(parent)?.children;
        let pos = reference
            .and_then(|r| siblings.iter().position(|c| *c == r))
            .unwrap_or(siblings.len());
        siblings.insert(pos, child);
        self.node_mut(child)?.parent = Some(parent);

        self.records.push(MutationRecord::ChildList {
            target: parent,
            added: vec![child],
            removed: Vec::new(),
        });
        Ok(())
    }

    /// Insert `child` immediately after `reference`.
    pub fn insert_after(&mut self, reference: NodeId, child: NodeId) -> DocumentResult<()> {
        let parent = self.parent(reference).ok_or(DocumentError::NoParent(reference))?;
        let next = self.next_sibling(reference);
        self.insert_before(parent, child, next)
    }

    /// Swap `old` for `new` at the same position.
    pub fn replace(&mut self, old: NodeId, new: NodeId) -> DocumentResult<()> {
        let parent = self.parent(old).ok_or(DocumentError::NoParent(old))?;
        self.check_insert(parent, new)?;
        self.detach(new);

        let siblings = &mut self.node_mut(parent)?.children;
        let pos = siblings
            .iter()
            .position(|c| *c == old)
            .ok_or(DocumentError::NoParent(old))?;
        siblings[pos] = new;
        self.node_mut(old)?.parent = None;
        self.node_mut(new)?.parent = Some(parent);

        self.records.push(MutationRecord::ChildList {
            target: parent,
            added: vec![new],
            removed: vec![old],
        });
        Ok(())
    }

    /// Remove `id` from its parent. Returns false when it had none.
    pub fn detach(&mut self, id: NodeId) -> bool {
        let Some(parent) = self.parent(id) else {
            return false;
        };
        if let Some(node) = self.nodes.get_mut(parent.0) {
            node.children.retain(|c| *c != id);
        }
        if let Some(node) = self.nodes.get_mut(id.0) {
            node.parent = None;
        }
        self.records.push(MutationRecord::ChildList {
            target: parent,
            added: Vec::new(),
            removed: vec![id],
        });
        true
    }

    fn check_insert(&self, parent: NodeId, child: NodeId) -> DocumentResult<()> {
        self.node(child)?;
        if !matches!(self.node(parent)?.kind, NodeKind::Element(_)) {
            return Err(DocumentError::NotAnElement(parent));
        }
        if self.contains(child, parent) {
            return Err(DocumentError::Cycle { parent, child });
        }
        Ok(())
    }

    /// Drain the records accumulated since the last call.
    pub fn take_records(&mut self) -> Vec<MutationRecord> {
        std::mem::take(&mut self.records)
    }

    // ---- rendering ----

    /// Render `id` as minimal markup, for diagnostics and the CLI.
    pub fn render(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.render_into(id, &mut out);
        out
    }

    fn render_into(&self, id: NodeId, out: &mut String) {
        match self.kind(id) {
            Some(NodeKind::Text(text)) => out.push_str(&escape(text)),
            Some(NodeKind::Element(el)) => {
                out.push('<');
                out.push_str(&el.tag);
                for (name, value) in &el.attrs {
                    out.push_str(&format!(" {}=\"{}\"", name, escape(value)));
                }
                out.push('>');
                for child in self.children(id) {
                    self.render_into(*child, out);
                }
                out.push_str(&format!("</{}>", el.tag));
            }
            None => {}
        }
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
#[path = "tree_tests.rs"]
mod tests;
