use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One node of the privilege tree. Only action leaves carry a privilege id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub name: String,
    #[serde(default)]
    pub nodes: Vec<TreeNode>,
}

impl TreeNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            nodes: Vec::new(),
        }
    }

    pub fn leaf(id: Uuid, name: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            name: name.into(),
            nodes: Vec::new(),
        }
    }

    /// Privilege ids of every leaf below this node, depth first
    pub fn leaf_ids(&self) -> Vec<Uuid> {
        let mut ids = Vec::new();
        self.collect_leaf_ids(&mut ids);
        ids
    }

    fn collect_leaf_ids(&self, ids: &mut Vec<Uuid>) {
        if let Some(id) = self.id {
            ids.push(id);
        }
        for node in &self.nodes {
            node.collect_leaf_ids(ids);
        }
    }
}

/// Privileges grouped by area, controller and action, plus the ids checked for a role
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrivilegeTree {
    #[serde(default)]
    pub nodes: Vec<TreeNode>,
    #[serde(default)]
    pub selected_ids: Vec<Uuid>,
}

impl PrivilegeTree {
    pub fn leaf_ids(&self) -> Vec<Uuid> {
        self.nodes.iter().flat_map(TreeNode::leaf_ids).collect()
    }
}
