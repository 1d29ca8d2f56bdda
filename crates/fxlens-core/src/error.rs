//! Core errors.

use thiserror::Error;

use crate::document::NodeId;

/// Structural errors raised by document operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DocumentError {
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("Node {0} is not an element")]
    NotAnElement(NodeId),

    #[error("Node {0} is not a text node")]
    NotText(NodeId),

    #[error("Node {0} has no parent")]
    NoParent(NodeId),

    #[error("Cannot insert {child} under {parent}: would create a cycle")]
    Cycle { parent: NodeId, child: NodeId },
}

/// Errors raised while assembling the scanning pipeline.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid currency pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error(transparent)]
    Document(#[from] DocumentError),
}

pub type DocumentResult<T> = Result<T, DocumentError>;
