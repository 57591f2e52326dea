//! The construct-tree registry.

use crate::{ConstructKind, ConstructNode, Error, ManagedPolicy, NodeId, ResourceTemplate, Result};
use std::collections::HashMap;

/// A rooted construct tree with a typed node registry.
///
/// The tree owns every node, keyed by id. It is built once by the
/// tree-construction step and then handed to visitors, which resolve node
/// references through it instead of through any global state.
#[derive(Debug)]
pub struct ConstructTree {
    root: NodeId,
    nodes: HashMap<NodeId, ConstructNode>,
    policies: HashMap<String, ManagedPolicy>,
}

impl ConstructTree {
    /// Create a tree with a root node of kind `Other`.
    pub fn new(root: impl Into<NodeId>) -> Self {
        let root = root.into();
        let mut nodes = HashMap::new();
        nodes.insert(
            root.clone(),
            ConstructNode::new(root.clone(), ConstructKind::Other),
        );
        Self {
            root,
            nodes,
            policies: HashMap::new(),
        }
    }

    pub fn root(&self) -> &NodeId {
        &self.root
    }

    /// Register a node and wire it into its parent's general children.
    ///
    /// Returns the new node's id. Fails if the parent is unknown or the id
    /// is already taken.
    pub fn add_node(&mut self, parent: &NodeId, node: ConstructNode) -> Result<NodeId> {
        if !self.nodes.contains_key(parent) {
            return Err(Error::UnknownNode(parent.clone()));
        }
        if self.nodes.contains_key(&node.id) {
            return Err(Error::DuplicateNode(node.id.clone()));
        }
        let id = node.id.clone();
        self.nodes.insert(id.clone(), node);
        if let Some(parent) = self.nodes.get_mut(parent) {
            parent.children.push(id.clone());
        }
        Ok(id)
    }

    /// Link an already-registered node into a node's permission children.
    ///
    /// The same node may also be reachable through the general hierarchy;
    /// the tree does not deduplicate. Linking a node to itself or to one of
    /// its own ancestors is rejected: the general hierarchy is acyclic by
    /// path construction, and permission links must not undo that.
    pub fn add_permission_child(&mut self, parent: &NodeId, child: &NodeId) -> Result<()> {
        if !self.nodes.contains_key(child) {
            return Err(Error::UnknownNode(child.clone()));
        }
        if child == parent || parent.path().starts_with(&format!("{}/", child.path())) {
            return Err(Error::CyclicLink {
                parent: parent.clone(),
                child: child.clone(),
            });
        }
        let parent = self
            .nodes
            .get_mut(parent)
            .ok_or_else(|| Error::UnknownNode(parent.clone()))?;
        parent.permission_children.push(child.clone());
        Ok(())
    }

    /// Register a managed policy so later references to it resolve.
    pub fn define_managed_policy(
        &mut self,
        name: impl Into<String>,
        arn: impl Into<String>,
    ) -> Result<()> {
        let name = name.into();
        if self.policies.contains_key(&name) {
            return Err(Error::DuplicatePolicy(name));
        }
        self.policies.insert(
            name.clone(),
            ManagedPolicy {
                name,
                arn: arn.into(),
            },
        );
        Ok(())
    }

    pub fn managed_policy(&self, name: &str) -> Option<&ManagedPolicy> {
        self.policies.get(name)
    }

    pub fn get(&self, id: &NodeId) -> Option<&ConstructNode> {
        self.nodes.get(id)
    }

    pub fn get_mut(&mut self, id: &NodeId) -> Option<&mut ConstructNode> {
        self.nodes.get_mut(id)
    }

    /// Find a direct child of `id` by its local id.
    pub fn find_child(&self, id: &NodeId, local: &str) -> Option<&ConstructNode> {
        let node = self.nodes.get(id)?;
        node.children
            .iter()
            .find(|c| c.local() == local)
            .and_then(|c| self.nodes.get(c))
    }

    /// All Role constructs in the tree, in unspecified order.
    pub fn roles(&self) -> impl Iterator<Item = &ConstructNode> {
        self.nodes
            .values()
            .filter(|n| n.kind == ConstructKind::Role)
    }

    /// The template of a Role construct, found on its `Resource` child.
    pub fn role_template(&self, id: &NodeId) -> Option<&ResourceTemplate> {
        self.find_child(id, "Resource")
            .and_then(|n| n.template.as_ref())
    }

    /// Emit the synthesized template: every template-bearing node, keyed by
    /// its owning construct's path.
    pub fn synthesize(&self) -> serde_json::Value {
        let mut entries: Vec<(&NodeId, &ResourceTemplate)> = self
            .nodes
            .values()
            .filter_map(|n| n.template.as_ref().map(|t| (&n.id, t)))
            .collect();
        entries.sort_by(|a, b| a.0.path().cmp(b.0.path()));

        let mut resources = serde_json::Map::new();
        for (id, template) in entries {
            resources.insert(
                id.resource_owner().to_string(),
                serde_json::json!({
                    "Type": template.resource_type,
                    "Properties": template.properties,
                }),
            );
        }
        serde_json::json!({ "Resources": resources })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn role(tree: &mut ConstructTree, parent: &NodeId, local: &str) -> NodeId {
        let parent = parent.clone();
        let id = tree
            .add_node(
                &parent,
                ConstructNode::new(parent.child(local), ConstructKind::Role),
            )
            .unwrap();
        tree.add_node(
            &id,
            ConstructNode::new(id.child("Resource"), ConstructKind::Other)
                .with_template(ResourceTemplate::new("AWS::IAM::Role")),
        )
        .unwrap();
        id
    }

    #[test]
    fn test_add_and_find_child() {
        let mut tree = ConstructTree::new("Stack");
        let root = tree.root().clone();
        let id = role(&mut tree, &root, "NodeRole");
        assert!(tree.find_child(&id, "Resource").is_some());
        assert!(tree.find_child(&id, "Nope").is_none());
        assert_eq!(tree.roles().count(), 1);
    }

    #[test]
    fn test_duplicate_node_rejected() {
        let mut tree = ConstructTree::new("Stack");
        let root = tree.root().clone();
        role(&mut tree, &root, "NodeRole");
        let err = tree
            .add_node(
                &root,
                ConstructNode::new(root.child("NodeRole"), ConstructKind::Other),
            )
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateNode(_)));
    }

    #[test]
    fn test_unknown_parent_rejected() {
        let mut tree = ConstructTree::new("Stack");
        let err = tree
            .add_node(
                &NodeId::from("Stack/Missing"),
                ConstructNode::new("Stack/Missing/Child", ConstructKind::Other),
            )
            .unwrap_err();
        assert!(matches!(err, Error::UnknownNode(_)));
    }

    #[test]
    fn test_ancestor_permission_link_rejected() {
        let mut tree = ConstructTree::new("Stack");
        let root = tree.root().clone();
        let grants = tree
            .add_node(
                &root,
                ConstructNode::new(root.child("Grants"), ConstructKind::Other),
            )
            .unwrap();
        assert!(matches!(
            tree.add_permission_child(&grants, &root),
            Err(Error::CyclicLink { .. })
        ));
        assert!(matches!(
            tree.add_permission_child(&grants, &grants),
            Err(Error::CyclicLink { .. })
        ));
        // A sibling with a merely similar path prefix is not an ancestor.
        let sibling = tree
            .add_node(
                &root,
                ConstructNode::new(root.child("GrantsExtra"), ConstructKind::Other),
            )
            .unwrap();
        tree.add_permission_child(&sibling, &grants).unwrap();
    }

    #[test]
    fn test_managed_policy_registry() {
        let mut tree = ConstructTree::new("Stack");
        tree.define_managed_policy("boundary", "arn:aws:iam::123:policy/Boundary")
            .unwrap();
        assert_eq!(
            tree.managed_policy("boundary").unwrap().arn,
            "arn:aws:iam::123:policy/Boundary"
        );
        assert!(tree.managed_policy("other").is_none());
        assert!(matches!(
            tree.define_managed_policy("boundary", "arn:aws:iam::123:policy/Again"),
            Err(Error::DuplicatePolicy(_))
        ));
    }

    #[test]
    fn test_synthesize_keys_by_owner() {
        let mut tree = ConstructTree::new("Stack");
        let root = tree.root().clone();
        role(&mut tree, &root, "NodeRole");

        let template = tree.synthesize();
        let resources = template["Resources"].as_object().unwrap();
        assert_eq!(resources.len(), 1);
        assert_eq!(
            resources["Stack/NodeRole"]["Type"],
            serde_json::json!("AWS::IAM::Role")
        );
    }
}
