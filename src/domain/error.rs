//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::scene::NodeId;

/// Domain errors represent scene-graph contract violations.
///
/// Missing data and malformed matrix nodes are not errors: the builder normalizes them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("unknown scene node: {0:?}")]
    UnknownNode(NodeId),

    #[error("cannot remove the scene container")]
    ContainerRemoval,

    #[error("cannot attach children to text node: {0:?}")]
    NotAnElement(NodeId),
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
