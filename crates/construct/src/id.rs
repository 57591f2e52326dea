use serde::{Deserialize, Serialize};

/// A unique identifier for a node within a tree.
///
/// Ids are path-like strings built from the local ids of the node's
/// ancestors, e.g. `Stack/IamRoles/NodeRole`. They are assigned when the
/// tree is constructed and never change.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// The full path of this node.
    pub fn path(&self) -> &str {
        &self.0
    }

    /// The last path segment (the node's local id).
    pub fn local(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    /// The id of a child with the given local id.
    pub fn child(&self, local: &str) -> NodeId {
        NodeId(format!("{}/{}", self.0, local))
    }

    /// The path with a trailing `/Resource` segment stripped, if present.
    ///
    /// Template-bearing nodes conventionally sit under a `Resource` child;
    /// the synthesized template keys resources by the owning construct.
    pub fn resource_owner(&self) -> &str {
        self.0.strip_suffix("/Resource").unwrap_or(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_segment() {
        let id = NodeId::from("Stack/IamRoles/NodeRole");
        assert_eq!(id.local(), "NodeRole");
        assert_eq!(NodeId::from("Stack").local(), "Stack");
    }

    #[test]
    fn test_child_path() {
        let id = NodeId::from("Stack/NodeRole");
        assert_eq!(id.child("Resource").path(), "Stack/NodeRole/Resource");
    }

    #[test]
    fn test_resource_owner() {
        assert_eq!(
            NodeId::from("Stack/NodeRole/Resource").resource_owner(),
            "Stack/NodeRole"
        );
        assert_eq!(NodeId::from("Stack/Vpc").resource_owner(), "Stack/Vpc");
    }
}
