use std::collections::HashSet;

use uuid::Uuid;

use crate::database::models::{Account, Privilege, Role};
use crate::database::{Filter, Store};
use crate::services::error::ServiceError;
use crate::views::{AccountEditView, RoleView};

pub const MAX_ROLE_NAME_LENGTH: usize = 128;

/// Checks a role view before it is written
pub struct RoleValidator<S: Store> {
    store: S,
}

impl<S: Store> RoleValidator<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn can_create(&self, view: &RoleView) -> Result<(), ServiceError> {
        self.check_name(view).await?;
        self.check_privileges(view).await
    }

    pub async fn can_edit(&self, view: &RoleView) -> Result<(), ServiceError> {
        self.check_exists(view.id).await?;
        self.check_name(view).await?;
        self.check_privileges(view).await
    }

    pub async fn can_delete(&self, id: Uuid) -> Result<(), ServiceError> {
        self.check_exists(id).await
    }

    async fn check_exists(&self, id: Uuid) -> Result<(), ServiceError> {
        match self.store.find::<Role>(id).await? {
            Some(_) => Ok(()),
            None => Err(ServiceError::not_found(format!("Role {} not found", id))),
        }
    }

    async fn check_name(&self, view: &RoleView) -> Result<(), ServiceError> {
        let name = view.name.trim();
        if name.is_empty() {
            return Err(ServiceError::invalid("name", "Role name is required"));
        }
        if name.chars().count() > MAX_ROLE_NAME_LENGTH {
            return Err(ServiceError::invalid(
                "name",
                format!("Role name must be at most {} characters", MAX_ROLE_NAME_LENGTH),
            ));
        }

        let lowered = name.to_lowercase();
        let roles: Vec<Role> = self.store.select(Filter::new()).await?;
        let taken = roles
            .iter()
            .any(|role| role.id != view.id && role.name.to_lowercase() == lowered);
        if taken {
            return Err(ServiceError::invalid(
                "name",
                format!("Role '{}' already exists", name),
            ));
        }
        Ok(())
    }

    async fn check_privileges(&self, view: &RoleView) -> Result<(), ServiceError> {
        let selected = &view.privileges_tree.selected_ids;
        if selected.is_empty() {
            return Ok(());
        }

        let privileges: Vec<Privilege> = self.store.select(Filter::new()).await?;
        let known: HashSet<Uuid> = privileges.iter().map(|privilege| privilege.id).collect();
        match selected.iter().find(|id| !known.contains(id)) {
            Some(missing) => Err(ServiceError::invalid(
                "privileges_tree",
                format!("Privilege {} does not exist", missing),
            )),
            None => Ok(()),
        }
    }
}

/// Checks an account role assignment
pub struct AccountValidator<S: Store> {
    store: S,
}

impl<S: Store> AccountValidator<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn can_edit(&self, id: Uuid, view: &AccountEditView) -> Result<(), ServiceError> {
        if self.store.find::<Account>(id).await?.is_none() {
            return Err(ServiceError::not_found(format!("Account {} not found", id)));
        }
        self.check_role(view.role_id).await
    }

    pub async fn check_role(&self, role_id: Option<Uuid>) -> Result<(), ServiceError> {
        let Some(role_id) = role_id else {
            return Ok(());
        };
        match self.store.find::<Role>(role_id).await? {
            Some(_) => Ok(()),
            None => Err(ServiceError::invalid(
                "role_id",
                format!("Role {} does not exist", role_id),
            )),
        }
    }

    pub async fn can_delete(&self, id: Uuid) -> Result<(), ServiceError> {
        match self.store.find::<Account>(id).await? {
            Some(_) => Ok(()),
            None => Err(ServiceError::not_found(format!("Account {} not found", id))),
        }
    }

    /// Usernames and emails are unique ignoring case
    pub async fn can_create(
        &self,
        username: &str,
        email: &str,
        role_id: Option<Uuid>,
    ) -> Result<(), ServiceError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(ServiceError::invalid("username", "Username is required"));
        }
        let email = email.trim();
        if email.is_empty() {
            return Err(ServiceError::invalid("email", "Email is required"));
        }

        let accounts: Vec<Account> = self.store.select(Filter::new()).await?;
        let username_lowered = username.to_lowercase();
        if accounts
            .iter()
            .any(|account| account.username.to_lowercase() == username_lowered)
        {
            return Err(ServiceError::invalid(
                "username",
                format!("Username '{}' is already taken", username),
            ));
        }
        let email_lowered = email.to_lowercase();
        if accounts
            .iter()
            .any(|account| account.email.to_lowercase() == email_lowered)
        {
            return Err(ServiceError::invalid(
                "email",
                format!("Email '{}' is already used", email),
            ));
        }

        self.check_role(role_id).await
    }
}

#[cfg(test)]
mod tests {
    use crate::database::{MemoryStore, UnitOfWork};
    use crate::views::PrivilegeTree;

    use super::*;

    async fn store_with_role(name: &str) -> (MemoryStore, Role) {
        let store = MemoryStore::new();
        let role = Role {
            id: Uuid::new_v4(),
            name: name.to_string(),
        };
        let mut uow = store.begin().await.unwrap();
        uow.insert(&role).await.unwrap();
        uow.commit().await.unwrap();
        (store, role)
    }

    fn view(name: &str) -> RoleView {
        RoleView {
            id: Uuid::new_v4(),
            name: name.to_string(),
            privileges_tree: PrivilegeTree::default(),
        }
    }

    #[tokio::test]
    async fn name_rules() {
        let (store, _) = store_with_role("Editors").await;
        let validator = RoleValidator::new(store);

        assert!(validator.can_create(&view("Reviewers")).await.is_ok());
        assert!(matches!(
            validator.can_create(&view("   ")).await,
            Err(ServiceError::Validation { .. })
        ));
        assert!(validator.can_create(&view(&"x".repeat(129))).await.is_err());
        assert!(validator.can_create(&view(&"x".repeat(128))).await.is_ok());
        assert!(validator.can_create(&view(" EDITORS ")).await.is_err());
    }

    #[tokio::test]
    async fn renaming_to_own_name_is_allowed() {
        let (store, role) = store_with_role("Editors").await;
        let validator = RoleValidator::new(store);

        let mut own = view("editors");
        own.id = role.id;
        assert!(validator.can_edit(&own).await.is_ok());
    }

    #[tokio::test]
    async fn unknown_role_and_privileges() {
        let (store, _) = store_with_role("Editors").await;
        let validator = RoleValidator::new(store);

        let err = validator.can_edit(&view("Ghosts")).await.unwrap_err();
        assert!(err.is_not_found());

        let mut selecting = view("Reviewers");
        selecting.privileges_tree.selected_ids = vec![Uuid::new_v4()];
        let err = validator.can_create(&selecting).await.unwrap_err();
        match err {
            ServiceError::Validation { field_errors, .. } => {
                assert!(field_errors.contains_key("privileges_tree"))
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn account_role_must_exist() {
        let (store, role) = store_with_role("Editors").await;
        let account = Account::new("jane", "jane@example.com");
        let mut uow = store.begin().await.unwrap();
        uow.insert(&account).await.unwrap();
        uow.commit().await.unwrap();

        let validator = AccountValidator::new(store);
        let assign = |role_id| AccountEditView { role_id };

        assert!(validator.can_edit(account.id, &assign(Some(role.id))).await.is_ok());
        assert!(validator.can_edit(account.id, &assign(None)).await.is_ok());
        assert!(validator
            .can_edit(account.id, &assign(Some(Uuid::new_v4())))
            .await
            .is_err());
        assert!(validator
            .can_edit(Uuid::new_v4(), &assign(None))
            .await
            .unwrap_err()
            .is_not_found());
        assert!(validator.can_create("jane", "jane2@example.com", None).await.is_err());
        assert!(validator.can_delete(account.id).await.is_ok());
        assert!(validator.can_delete(Uuid::new_v4()).await.unwrap_err().is_not_found());
    }

    fn field(err: ServiceError) -> String {
        match err {
            ServiceError::Validation { field_errors, .. } => {
                field_errors.into_keys().next().unwrap_or_default()
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn account_logins_are_unique_ignoring_case() {
        let store = MemoryStore::new();
        let mut uow = store.begin().await.unwrap();
        uow.insert(&Account::new("Jane", "jane@example.com")).await.unwrap();
        uow.commit().await.unwrap();
        let validator = AccountValidator::new(store);

        let taken = validator.can_create("JANE", "other@example.com", None).await;
        assert_eq!(field(taken.unwrap_err()), "username");

        let used = validator.can_create("bob", "JANE@example.com", None).await;
        assert_eq!(field(used.unwrap_err()), "email");

        let blank = validator.can_create("bob", "  ", None).await;
        assert_eq!(field(blank.unwrap_err()), "email");

        assert!(validator.can_create("bob", "bob@example.com", None).await.is_ok());
    }
}
