//! Node types for the construct tree.

use crate::NodeId;
use serde::{Deserialize, Serialize};

/// The classification of a construct, decided once at construction time.
///
/// The visitor in the `aspect` crate only distinguishes roles from
/// everything else, so the tag is a closed two-variant enum rather than an
/// open resource-type string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConstructKind {
    /// An IAM role construct. Its synthesized template lives on its
    /// `Resource` child.
    Role,
    /// Any other construct.
    Other,
}

/// The underlying synthesized resource of a construct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceTemplate {
    /// The template resource type, e.g. `AWS::IAM::Role`.
    #[serde(rename = "type")]
    pub resource_type: String,

    /// Template properties. Property overrides applied during synthesis
    /// write directly into this map.
    #[serde(default)]
    pub properties: serde_json::Map<String, serde_json::Value>,
}

impl ResourceTemplate {
    pub fn new(resource_type: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            properties: serde_json::Map::new(),
        }
    }

    /// Overwrite a template property. Last write wins.
    pub fn set_property(&mut self, name: &str, value: serde_json::Value) {
        self.properties.insert(name.to_string(), value);
    }

    pub fn property(&self, name: &str) -> Option<&serde_json::Value> {
        self.properties.get(name)
    }
}

/// A node in the construct tree.
///
/// Children are edge lists of [`NodeId`]s rather than owned nodes; the
/// [`ConstructTree`](crate::ConstructTree) owns every node. A node may
/// appear both in a parent's general `children` and in some node's
/// `permission_children` — visitors must tolerate reaching it twice.
#[derive(Debug, Clone)]
pub struct ConstructNode {
    pub id: NodeId,
    pub kind: ConstructKind,
    /// General hierarchy, in registration order.
    pub children: Vec<NodeId>,
    /// Secondary hierarchy for permission-bearing constructs. Empty for
    /// nodes that do not expose one.
    pub permission_children: Vec<NodeId>,
    /// The underlying synthesized resource, if this node carries one.
    pub template: Option<ResourceTemplate>,
}

impl ConstructNode {
    pub fn new(id: impl Into<NodeId>, kind: ConstructKind) -> Self {
        Self {
            id: id.into(),
            kind,
            children: Vec::new(),
            permission_children: Vec::new(),
            template: None,
        }
    }

    pub fn with_template(mut self, template: ResourceTemplate) -> Self {
        self.template = Some(template);
        self
    }
}

/// A named, reusable IAM policy with a stable ARN.
///
/// Managed policies are registered on the tree during construction so that
/// references to them resolve later in the same synthesis pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagedPolicy {
    pub name: String,
    pub arn: String,
}
