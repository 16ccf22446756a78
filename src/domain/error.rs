//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::entities::{NodeId, NodeKind};

/// Reasons a mutation left the tree unchanged.
///
/// The silent mutators swallow these; the `try_*` variants report them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("node {id} is a {kind} and cannot take a branch member")]
    InvalidTarget { id: NodeId, kind: NodeKind },

    #[error("the director cannot be removed: {0}")]
    RootRemoval(NodeId),

    #[error("id source returned an id already in use: {0}")]
    DuplicateId(NodeId),
}

/// Result type for engine operations.
pub type DomainResult<T> = Result<T, DomainError>;
