//! In-memory document tree.
//!
//! An arena of element and text nodes that external code mutates through the
//! same API the annotator uses. Every structural or text change is recorded
//! and delivered to subscribers as a [`MutationBatch`].

mod mutation;
mod node;
mod shared;
mod tree;

pub use mutation::{MutationBatch, MutationRecord};
pub use node::{Element, NodeId, NodeKind};
pub use shared::SharedDocument;
pub use tree::Document;
