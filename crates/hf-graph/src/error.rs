//! Graph-specific error types.

use hf_core::{LinkId, NodeId};
use thiserror::Error;

pub type GraphResult<T> = Result<T, GraphError>;

/// Graph construction and validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// A link refers to a node that doesn't exist.
    #[error("Link {link} refers to non-existent node {node}")]
    InvalidNodeRef { link: LinkId, node: NodeId },

    #[error("Link {link} starts and ends at node {node}")]
    SelfLoop { link: LinkId, node: NodeId },

    /// Link listed in a node's incidence but not touching it.
    #[error("Link {link} in node {node}'s adjacency list but doesn't touch that node")]
    InconsistentAdjacency { link: LinkId, node: NodeId },

    #[error("{what} not found in index map")]
    IdNotFound { what: &'static str },
}
