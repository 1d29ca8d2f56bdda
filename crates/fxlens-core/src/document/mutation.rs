//! Mutation records delivered to observers.

use super::NodeId;

/// One observed change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationRecord {
    /// Children of `target` were added and/or removed.
    ChildList {
        target: NodeId,
        added: Vec<NodeId>,
        removed: Vec<NodeId>,
    },
    /// The text of `target` changed.
    CharacterData { target: NodeId },
}

impl MutationRecord {
    pub fn added(&self) -> &[NodeId] {
        match self {
            Self::ChildList { added, .. } => added,
            Self::CharacterData { .. } => &[],
        }
    }

    pub fn removed(&self) -> &[NodeId] {
        match self {
            Self::ChildList { removed, .. } => removed,
            Self::CharacterData { .. } => &[],
        }
    }
}

/// All records produced by one critical section over the document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MutationBatch {
    pub records: Vec<MutationRecord>,
}

impl MutationBatch {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }
}
