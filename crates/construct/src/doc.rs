//! YAML document format for declaring construct trees.
//!
//! A tree document declares nodes with *local* ids; full node ids are
//! derived from the ancestor path, so the document never repeats paths:
//!
//! ```yaml
//! managed_policies:
//!   - name: project-boundary
//!     arn: arn:aws:iam::111122223333:policy/Boundary
//! tree:
//!   id: Stack
//!   children:
//!     - id: NodeRole
//!       kind: role
//!       children:
//!         - id: Resource
//!           template:
//!             type: AWS::IAM::Role
//! ```
//!
//! `permission_children` entries are full node paths, resolved after the
//! whole tree is built; a dangling path is an error.

use crate::{ConstructKind, ConstructNode, ConstructTree, Error, NodeId, ResourceTemplate, Result};
use serde::Deserialize;
use std::path::Path;

/// A parsed tree document.
#[derive(Debug, Deserialize)]
pub struct TreeDoc {
    /// Managed policies to register before any nodes are linked.
    #[serde(default)]
    pub managed_policies: Vec<ManagedPolicyDoc>,

    /// The root node declaration.
    pub tree: NodeDoc,
}

#[derive(Debug, Deserialize)]
pub struct ManagedPolicyDoc {
    pub name: String,
    pub arn: String,
}

/// A node declaration. `id` is local; children are nested declarations.
#[derive(Debug, Deserialize)]
pub struct NodeDoc {
    pub id: String,

    #[serde(default = "default_kind")]
    pub kind: ConstructKind,

    #[serde(default)]
    pub template: Option<ResourceTemplate>,

    #[serde(default)]
    pub children: Vec<NodeDoc>,

    /// Full paths of permission children, e.g. `Stack/Grants/ReadPolicy`.
    #[serde(default)]
    pub permission_children: Vec<String>,
}

fn default_kind() -> ConstructKind {
    ConstructKind::Other
}

impl TreeDoc {
    /// Load a tree document from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&content)
    }

    /// Parse a tree document from a YAML string.
    pub fn parse(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| Error::Parse(e.to_string()))
    }

    /// Build the [`ConstructTree`] this document declares.
    ///
    /// Nodes are registered in document order; permission-child links are
    /// resolved in a second pass so they may point anywhere in the tree.
    pub fn build(&self) -> Result<ConstructTree> {
        let mut tree = ConstructTree::new(self.tree.id.as_str());
        for policy in &self.managed_policies {
            tree.define_managed_policy(policy.name.as_str(), policy.arn.as_str())?;
        }

        let root = tree.root().clone();
        if let Some(node) = tree.get_mut(&root) {
            node.kind = self.tree.kind;
            if let Some(template) = &self.tree.template {
                node.template = Some(template.clone());
            }
        }
        for child in &self.tree.children {
            add_subtree(&mut tree, &root, child)?;
        }

        let mut links: Vec<(NodeId, NodeId)> = Vec::new();
        collect_permission_links(&root, &self.tree, &mut links);
        for (parent, child) in links {
            tree.add_permission_child(&parent, &child)?;
        }
        Ok(tree)
    }
}

fn add_subtree(tree: &mut ConstructTree, parent: &NodeId, doc: &NodeDoc) -> Result<()> {
    let mut node = ConstructNode::new(parent.child(&doc.id), doc.kind);
    if let Some(template) = &doc.template {
        node.template = Some(template.clone());
    }
    let id = tree.add_node(parent, node)?;
    for child in &doc.children {
        add_subtree(tree, &id, child)?;
    }
    Ok(())
}

fn collect_permission_links(id: &NodeId, doc: &NodeDoc, links: &mut Vec<(NodeId, NodeId)>) {
    for path in &doc.permission_children {
        links.push((id.clone(), NodeId::from(path.as_str())));
    }
    for child in &doc.children {
        collect_permission_links(&id.child(&child.id), child, links);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"
managed_policies:
  - name: project-boundary
    arn: arn:aws:iam::123:policy/Boundary
tree:
  id: Stack
  children:
    - id: NodeRole
      kind: role
      children:
        - id: Resource
          template:
            type: AWS::IAM::Role
            properties:
              RoleName: node-role
    - id: Grants
      permission_children: [Stack/NodeRole]
"#;

    #[test]
    fn test_build_from_document() {
        let tree = TreeDoc::parse(DOC).unwrap().build().unwrap();
        let role = NodeId::from("Stack/NodeRole");
        assert_eq!(tree.get(&role).unwrap().kind, ConstructKind::Role);
        assert_eq!(
            tree.role_template(&role).unwrap().property("RoleName"),
            Some(&serde_json::json!("node-role"))
        );
        assert_eq!(
            tree.managed_policy("project-boundary").unwrap().arn,
            "arn:aws:iam::123:policy/Boundary"
        );
        let grants = tree.get(&NodeId::from("Stack/Grants")).unwrap();
        assert_eq!(grants.permission_children, vec![role]);
    }

    #[test]
    fn test_dangling_permission_child_rejected() {
        let doc = r#"
tree:
  id: Stack
  children:
    - id: Grants
      permission_children: [Stack/Missing]
"#;
        let err = TreeDoc::parse(doc).unwrap().build().unwrap_err();
        assert!(matches!(err, Error::UnknownNode(_)));
    }

    #[test]
    fn test_root_kind_is_applied() {
        let doc = r#"
tree:
  id: RootRole
  kind: role
  children:
    - id: Resource
      template:
        type: AWS::IAM::Role
"#;
        let tree = TreeDoc::parse(doc).unwrap().build().unwrap();
        assert_eq!(tree.get(tree.root()).unwrap().kind, ConstructKind::Role);
        assert!(tree.role_template(tree.root()).is_some());
    }

    #[test]
    fn test_ancestor_permission_child_rejected() {
        let doc = r#"
tree:
  id: Stack
  children:
    - id: Grants
      permission_children: [Stack]
"#;
        let err = TreeDoc::parse(doc).unwrap().build().unwrap_err();
        assert!(matches!(err, Error::CyclicLink { .. }));
    }

    #[test]
    fn test_invalid_yaml_rejected() {
        assert!(matches!(TreeDoc::parse("tree: ["), Err(Error::Parse(_))));
    }
}
