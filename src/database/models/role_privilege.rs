use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::database::entity::{Column, Entity, ForeignKey, OnDelete, TableDef, UniqueKey};

/// Grant of one privilege to one role
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct RolePrivilege {
    pub id: Uuid,
    pub role_id: Uuid,
    pub privilege_id: Uuid,
}

impl RolePrivilege {
    pub fn new(role_id: Uuid, privilege_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            role_id,
            privilege_id,
        }
    }
}

impl Entity for RolePrivilege {
    const TABLE: &'static TableDef = &TableDef {
        name: "role_privileges",
        columns: &[
            Column { name: "id", sql_type: "uuid" },
            Column { name: "role_id", sql_type: "uuid" },
            Column { name: "privilege_id", sql_type: "uuid" },
        ],
        unique: &[UniqueKey::exact(&["role_id", "privilege_id"])],
        foreign_keys: &[
            ForeignKey {
                column: "role_id",
                table: "roles",
                on_delete: OnDelete::Cascade,
            },
            ForeignKey {
                column: "privilege_id",
                table: "privileges",
                on_delete: OnDelete::Cascade,
            },
        ],
    };

    fn id(&self) -> Uuid {
        self.id
    }
}
