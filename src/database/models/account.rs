use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::database::entity::{Column, Entity, ForeignKey, OnDelete, TableDef, UniqueKey};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Account {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Account {
    pub fn new(username: &str, email: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.to_string(),
            email: email.to_lowercase(),
            role_id: None,
            created_at: Utc::now(),
        }
    }
}

impl Entity for Account {
    const TABLE: &'static TableDef = &TableDef {
        name: "accounts",
        columns: &[
            Column { name: "id", sql_type: "uuid" },
            Column { name: "username", sql_type: "text" },
            Column { name: "email", sql_type: "text" },
            Column { name: "role_id", sql_type: "uuid" },
            Column { name: "created_at", sql_type: "timestamptz" },
        ],
        unique: &[
            UniqueKey::ignore_case(&["username"]),
            UniqueKey::ignore_case(&["email"]),
        ],
        // Accounts must be detached before their role is deleted
        foreign_keys: &[ForeignKey {
            column: "role_id",
            table: "roles",
            on_delete: OnDelete::NoAction,
        }],
    };

    fn id(&self) -> Uuid {
        self.id
    }
}
