use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::database::entity::{Column, Entity, TableDef};

/// Audit trail entry: who changed what
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Log {
    pub id: Uuid,
    /// Acting account; `None` for the admin CLI
    pub account_id: Option<Uuid>,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl Log {
    pub fn new(account_id: Option<Uuid>, message: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            account_id,
            message: message.into(),
            created_at: Utc::now(),
        }
    }
}

impl Entity for Log {
    // No foreign key: entries outlive the accounts they name
    const TABLE: &'static TableDef = &TableDef {
        name: "logs",
        columns: &[
            Column { name: "id", sql_type: "uuid" },
            Column { name: "account_id", sql_type: "uuid" },
            Column { name: "message", sql_type: "text" },
            Column { name: "created_at", sql_type: "timestamptz" },
        ],
        unique: &[],
        foreign_keys: &[],
    };

    fn id(&self) -> Uuid {
        self.id
    }
}
