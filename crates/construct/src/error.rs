//! Construct-tree error types.

use crate::NodeId;
use thiserror::Error;

/// Construct-tree errors.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// A node with this id already exists in the tree.
    #[error("duplicate node id '{0}'")]
    DuplicateNode(NodeId),

    /// A node id was referenced but never registered.
    #[error("unknown node '{0}'")]
    UnknownNode(NodeId),

    /// A permission-child link would point at the node itself or one of
    /// its ancestors, creating a cycle.
    #[error("permission child '{child}' is '{parent}' or one of its ancestors")]
    CyclicLink { parent: NodeId, child: NodeId },

    /// A managed policy with this name already exists in the tree.
    #[error("duplicate managed policy '{0}'")]
    DuplicatePolicy(String),

    /// Failed to parse a tree document.
    #[error("failed to parse tree document: {0}")]
    Parse(String),

    /// An I/O error occurred while reading a tree document.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
