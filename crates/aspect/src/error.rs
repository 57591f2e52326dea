//! Aspect error types.

use construct::NodeId;
use thiserror::Error;

/// Aspect errors.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The boundary reference was empty or blank.
    ///
    /// An empty boundary would synthesize roles without the mandated
    /// control, so it is rejected before a visitor can be built.
    #[error("permission boundary reference must not be empty")]
    EmptyReference,

    /// The named managed policy is not registered on the tree.
    #[error("managed policy '{0}' is not defined in this tree")]
    UnknownManagedPolicy(String),

    /// A child id recorded in the tree does not resolve to a node.
    #[error("unresolvable node reference '{0}'")]
    UnresolvableNode(NodeId),

    /// The walk reached a node that is already on the current descent
    /// path. The tree is expected to be acyclic; aborting beats
    /// overflowing the stack.
    #[error("cyclic reference at '{0}'")]
    CyclicReference(NodeId),

    /// A Role construct has no `Resource` child carrying its template.
    ///
    /// Skipping such a role would emit infrastructure missing a required
    /// security control, so the pass aborts instead.
    #[error("role '{0}' has no underlying Resource template")]
    RoleWithoutResource(NodeId),
}

pub type Result<T> = std::result::Result<T, Error>;
