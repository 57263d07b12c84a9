use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::models::Account;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountView {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role_id: Option<Uuid>,
    #[serde(default)]
    pub role_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Body of an account edit: the role to assign, or null to clear it
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AccountEditView {
    pub role_id: Option<Uuid>,
}

impl From<Account> for AccountView {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            username: account.username,
            email: account.email,
            role_id: account.role_id,
            role_name: None,
            created_at: account.created_at,
        }
    }
}

impl From<&AccountView> for Account {
    fn from(view: &AccountView) -> Self {
        Self {
            id: view.id,
            username: view.username.clone(),
            email: view.email.to_lowercase(),
            role_id: view.role_id,
            created_at: view.created_at,
        }
    }
}
