//! Synthesis-time tree visitors.
//!
//! Core principle: **every Role in a tree carries the mandated permissions
//! boundary, or synthesis fails.**
//!
//! The only visitor today is [`PermissionBoundary`], which walks a
//! [`ConstructTree`](construct::ConstructTree) once, depth-first, and
//! overwrites the `PermissionsBoundary` property on every Role's underlying
//! template. There is no partial-application mode: the boundary reference is
//! resolved before the walk begins, and any failure during the walk aborts
//! the whole pass.

mod boundary;
mod error;

pub use boundary::{PERMISSIONS_BOUNDARY, PermissionBoundary, PolicyReference, Report};
pub use error::{Error, Result};
