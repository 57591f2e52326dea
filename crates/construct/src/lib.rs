//! Typed construct-tree model for infrastructure synthesis.
//!
//! This crate provides the data model the rest of Breakwater operates on: a
//! rooted tree of construct nodes, owned by a [`ConstructTree`] registry that
//! maps node ids to nodes directly. There is no runtime reflection and no
//! global resolution context — code that needs to resolve a node receives the
//! tree as an explicit parameter.
//!
//! # Core Concepts
//!
//! ## ConstructTree
//!
//! The [`ConstructTree`] owns every node, keyed by [`NodeId`] (a path-like
//! string such as `Stack/IamRoles/NodeRole`). It also carries the
//! managed-policy table, so policies defined during tree construction are
//! resolvable later in the same synthesis pass.
//!
//! ## ConstructNode
//!
//! A [`ConstructNode`] has a [`ConstructKind`] decided once at construction
//! time (`Role` or `Other`), an ordered list of general children, an ordered
//! list of permission-specific children, and optionally a
//! [`ResourceTemplate`] — the underlying synthesized resource. Following the
//! source convention, a Role construct's template lives on its child with
//! local id `Resource`.
//!
//! ## Documents
//!
//! The [`doc`] module defines a YAML document format for declaring trees in
//! files, used by the `breakwater` CLI.

mod error;
mod id;
mod node;
mod tree;

pub mod doc;

pub use error::{Error, Result};
pub use id::NodeId;
pub use node::{ConstructKind, ConstructNode, ManagedPolicy, ResourceTemplate};
pub use tree::ConstructTree;
