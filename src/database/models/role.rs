use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::database::entity::{Column, Entity, TableDef, UniqueKey};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Role {
    pub id: Uuid,
    pub name: String,
}

impl Entity for Role {
    const TABLE: &'static TableDef = &TableDef {
        name: "roles",
        columns: &[
            Column { name: "id", sql_type: "uuid" },
            Column { name: "name", sql_type: "text" },
        ],
        unique: &[UniqueKey::ignore_case(&["name"])],
        foreign_keys: &[],
    };

    fn id(&self) -> Uuid {
        self.id
    }
}
