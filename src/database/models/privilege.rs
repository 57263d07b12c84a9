use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::database::entity::{Column, Entity, TableDef, UniqueKey};

/// Permission to invoke one action of one controller, optionally inside an area
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Privilege {
    pub id: Uuid,
    pub area: Option<String>,
    pub controller: String,
    pub action: String,
}

impl Privilege {
    pub fn new(area: Option<&str>, controller: &str, action: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            area: area.map(str::to_string),
            controller: controller.to_string(),
            action: action.to_string(),
        }
    }

    pub fn key(&self) -> PrivilegeKey {
        PrivilegeKey {
            area: self.area.clone(),
            controller: self.controller.clone(),
            action: self.action.clone(),
        }
    }
}

impl Entity for Privilege {
    const TABLE: &'static TableDef = &TableDef {
        name: "privileges",
        columns: &[
            Column { name: "id", sql_type: "uuid" },
            Column { name: "area", sql_type: "text" },
            Column { name: "controller", sql_type: "text" },
            Column { name: "action", sql_type: "text" },
        ],
        unique: &[UniqueKey::exact(&["area", "controller", "action"])],
        foreign_keys: &[],
    };

    fn id(&self) -> Uuid {
        self.id
    }
}

/// The (area, controller, action) triple identifying a privilege
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PrivilegeKey {
    pub area: Option<String>,
    pub controller: String,
    pub action: String,
}

impl PrivilegeKey {
    pub fn new(area: Option<&str>, controller: &str, action: &str) -> Self {
        Self {
            area: area.map(str::to_string),
            controller: controller.to_string(),
            action: action.to_string(),
        }
    }

    pub fn matches(&self, area: Option<&str>, controller: &str, action: &str) -> bool {
        self.area.as_deref() == area && self.controller == controller && self.action == action
    }
}

impl std::fmt::Display for PrivilegeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.area {
            Some(area) => write!(f, "{}/{}/{}", area, self.controller, self.action),
            None => write!(f, "{}/{}", self.controller, self.action),
        }
    }
}
