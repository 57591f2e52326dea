//! Permission-boundary enforcement.

use crate::{Error, Result};
use construct::{ConstructKind, ConstructTree, NodeId};
use std::collections::HashSet;
use tracing::debug;

/// The template property the boundary is written to.
pub const PERMISSIONS_BOUNDARY: &str = "PermissionsBoundary";

/// A reference to the boundary policy, resolved at visit time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyReference {
    /// A literal policy ARN, used verbatim.
    Arn(String),
    /// The name of a managed policy registered on the tree.
    Managed(String),
}

impl PolicyReference {
    /// A literal ARN reference. Blank input is rejected outright rather
    /// than silently setting an empty boundary.
    pub fn arn(arn: impl Into<String>) -> Result<Self> {
        let arn = arn.into();
        if arn.trim().is_empty() {
            return Err(Error::EmptyReference);
        }
        Ok(Self::Arn(arn))
    }

    /// A managed-policy reference by name. Dereferenced when the visitor
    /// runs, so policies registered earlier in the same synthesis pass
    /// resolve.
    pub fn managed(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(Error::EmptyReference);
        }
        Ok(Self::Managed(name))
    }

    fn resolve(&self, tree: &ConstructTree) -> Result<String> {
        match self {
            Self::Arn(arn) => Ok(arn.clone()),
            Self::Managed(name) => tree
                .managed_policy(name)
                .map(|p| p.arn.clone())
                .ok_or_else(|| Error::UnknownManagedPolicy(name.clone())),
        }
    }
}

/// What a boundary pass did.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Report {
    /// Boundary writes performed. A role reachable through two paths is
    /// written (and counted) twice.
    pub boundaries_applied: usize,
    /// Node visits, counting a node once per path that reached it.
    pub nodes_visited: usize,
}

/// A visitor that sets the permissions boundary on every Role in a tree.
///
/// The walk is pre-order depth-first: a Role's template is overwritten and
/// the walk stops there; any other node has its permission children visited
/// first, then its general children. A node reachable through both
/// collections is visited twice, which is redundant but harmless since the
/// overwrite is idempotent.
pub struct PermissionBoundary {
    reference: PolicyReference,
}

impl PermissionBoundary {
    pub fn new(reference: PolicyReference) -> Self {
        Self { reference }
    }

    /// Run one boundary pass over the tree.
    ///
    /// The reference is resolved to an ARN before any node is touched, so a
    /// failed managed-policy lookup leaves the tree unmodified. Failures
    /// during the walk abort the whole pass; there is no partial-application
    /// mode and a failed run requires full re-synthesis.
    pub fn apply(&self, tree: &mut ConstructTree) -> Result<Report> {
        let arn = self.reference.resolve(tree)?;
        let mut report = Report::default();
        let root = tree.root().clone();
        let mut path = HashSet::new();
        self.walk(tree, &root, &arn, &mut path, &mut report)?;
        debug!(
            boundaries = report.boundaries_applied,
            visits = report.nodes_visited,
            "permission boundary pass complete"
        );
        Ok(report)
    }

    fn walk(
        &self,
        tree: &mut ConstructTree,
        id: &NodeId,
        arn: &str,
        path: &mut HashSet<NodeId>,
        report: &mut Report,
    ) -> Result<()> {
        report.nodes_visited += 1;
        let node = tree
            .get(id)
            .ok_or_else(|| Error::UnresolvableNode(id.clone()))?;

        match node.kind {
            ConstructKind::Role => {
                // The role's synthesized template lives on its Resource
                // child. The walk does not continue past the role.
                let resource = node
                    .children
                    .iter()
                    .find(|c| c.local() == "Resource")
                    .cloned()
                    .ok_or_else(|| Error::RoleWithoutResource(id.clone()))?;
                let template = tree
                    .get_mut(&resource)
                    .and_then(|n| n.template.as_mut())
                    .ok_or_else(|| Error::RoleWithoutResource(id.clone()))?;
                template.set_property(PERMISSIONS_BOUNDARY, serde_json::Value::String(arn.into()));
                report.boundaries_applied += 1;
                debug!(role = %id, "set permissions boundary");
            }
            ConstructKind::Other => {
                // A node already on the current descent path means a cycle;
                // fail instead of recursing forever. Re-reaching a node
                // through a second, independent path stays legal.
                if !path.insert(id.clone()) {
                    return Err(Error::CyclicReference(id.clone()));
                }
                let permission_children = node.permission_children.clone();
                let children = node.children.clone();
                for child in &permission_children {
                    self.walk(tree, child, arn, path, report)?;
                }
                for child in &children {
                    self.walk(tree, child, arn, path, report)?;
                }
                path.remove(id);
            }
        }
        Ok(())
    }
}
