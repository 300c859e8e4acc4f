//! Error types for DOM operations
//!
//! Simple, flat error hierarchy. No over-engineering.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DomError>;

#[derive(Debug, Error)]
pub enum DomError {
    #[error("Node not found: {0}")]
    NodeNotFound(u32),

    #[error("Invalid node type: expected {expected}, got {actual}")]
    InvalidNodeType { expected: String, actual: String },

    #[error("Hierarchy request error: cannot insert node {child} into {parent}")]
    HierarchyRequest { parent: u32, child: u32 },

    #[error("Expected a document fragment, received {0}")]
    NotDocumentFragment(String),

    #[error("Unknown split direction: {0:?}")]
    InvalidDirection(String),

    #[error("Invalid tree description: {0}")]
    InvalidTree(String),

    #[error("Maximum tree depth exceeded: {current} > {max}")]
    MaxDepthExceeded { current: usize, max: usize },

    #[error("Parse error: {0}")]
    ParseError(#[from] serde_json::Error),
}
