use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::models::Role;
use crate::views::tree::PrivilegeTree;

/// Role as shown to and submitted by the administration UI.
/// On create and edit, `privileges_tree.selected_ids` is the full set of granted privileges.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoleView {
    #[serde(default)]
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub privileges_tree: PrivilegeTree,
}

impl From<Role> for RoleView {
    fn from(role: Role) -> Self {
        Self {
            id: role.id,
            name: role.name,
            privileges_tree: PrivilegeTree::default(),
        }
    }
}

impl From<&RoleView> for Role {
    fn from(view: &RoleView) -> Self {
        Self {
            id: view.id,
            name: view.name.trim().to_string(),
        }
    }
}
