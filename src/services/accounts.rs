use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::database::models::{Account, Role};
use crate::database::{Filter, Store};
use crate::security::Authorization;
use crate::services::error::ServiceError;
use crate::services::generic::{GenericService, PersistSteps};
use crate::services::validators::AccountValidator;
use crate::types::Operation;
use crate::views::{AccountEditView, AccountView};

struct AccountPersistence {
    authorization: Authorization,
}

#[async_trait]
impl<S: Store> PersistSteps<S, AccountView> for AccountPersistence {
    async fn committed(&self, _operation: Operation) -> Result<(), ServiceError> {
        self.authorization.refresh().await?;
        Ok(())
    }
}

pub struct AccountService<S: Store> {
    generic: GenericService<S, Account, AccountView>,
    validator: Arc<AccountValidator<S>>,
}

impl<S: Store> AccountService<S> {
    pub fn new(store: S, authorization: Authorization) -> Self {
        let steps = Arc::new(AccountPersistence { authorization });
        Self {
            generic: GenericService::new(store.clone(), steps),
            validator: Arc::new(AccountValidator::new(store)),
        }
    }

    /// Newest accounts first, each with its role name
    pub async fn get_views(&self) -> Result<Vec<AccountView>, ServiceError> {
        let roles = self.role_names().await?;
        let mut views = self.generic.get_views().await?;
        for view in views.iter_mut() {
            view.role_name = view.role_id.and_then(|id| roles.get(&id).cloned());
        }
        views.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(views)
    }

    pub async fn get_view(&self, id: Uuid) -> Result<AccountView, ServiceError> {
        let mut view = self.generic.get_view(id).await?;
        if let Some(role_id) = view.role_id {
            let role: Option<Role> = self.generic.store().find(role_id).await?;
            view.role_name = role.map(|role| role.name);
        }
        Ok(view)
    }

    /// Assign or clear the account's role
    pub async fn edit(&self, id: Uuid, edit: AccountEditView) -> Result<AccountView, ServiceError> {
        self.validator.can_edit(id, &edit).await?;

        let mut view = self.generic.get_view(id).await?;
        view.role_id = edit.role_id;
        self.generic.edit(&view).await?;

        tracing::info!("Account {} role set to {:?}", id, edit.role_id);
        self.get_view(id).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        self.validator.can_delete(id).await?;
        self.generic.delete(id).await
    }

    pub async fn create(
        &self,
        username: &str,
        email: &str,
        role_id: Option<Uuid>,
    ) -> Result<AccountView, ServiceError> {
        self.validator.can_create(username, email, role_id).await?;

        let mut account = Account::new(username.trim(), email.trim());
        account.role_id = role_id;
        let id = self.generic.create(&AccountView::from(account)).await?;
        self.get_view(id).await
    }

    async fn role_names(&self) -> Result<HashMap<Uuid, String>, ServiceError> {
        let roles: Vec<Role> = self.generic.store().select(Filter::new()).await?;
        Ok(roles.into_iter().map(|role| (role.id, role.name)).collect())
    }
}

impl<S: Store> Clone for AccountService<S> {
    fn clone(&self) -> Self {
        Self {
            generic: self.generic.clone(),
            validator: self.validator.clone(),
        }
    }
}
