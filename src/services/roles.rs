use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::database::models::{Account, Privilege, Role, RolePrivilege};
use crate::database::{Filter, Store, UnitOfWork};
use crate::resources::Resources;
use crate::security::Authorization;
use crate::services::error::ServiceError;
use crate::services::generic::{GenericService, PersistSteps};
use crate::services::privilege_tree::build_privilege_tree;
use crate::services::validators::RoleValidator;
use crate::types::Operation;
use crate::views::RoleView;

/// Keeps role links and account assignments consistent with role writes
struct RolePersistence {
    authorization: Authorization,
}

impl RolePersistence {
    async fn insert_links<U: UnitOfWork>(uow: &mut U, view: &RoleView) -> Result<(), ServiceError> {
        let mut seen = HashSet::new();
        for privilege_id in &view.privileges_tree.selected_ids {
            if seen.insert(*privilege_id) {
                uow.insert(&RolePrivilege::new(view.id, *privilege_id)).await?;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl<S: Store> PersistSteps<S, RoleView> for RolePersistence {
    async fn created(&self, uow: &mut S::UnitOfWork, view: &RoleView) -> Result<(), ServiceError> {
        Self::insert_links(uow, view).await
    }

    async fn edited(&self, uow: &mut S::UnitOfWork, view: &RoleView) -> Result<(), ServiceError> {
        let links: Vec<RolePrivilege> = uow.select(Filter::new().eq("role_id", view.id)).await?;
        for link in links {
            uow.delete::<RolePrivilege>(link.id).await?;
        }
        Self::insert_links(uow, view).await
    }

    async fn deleting(&self, uow: &mut S::UnitOfWork, id: Uuid) -> Result<(), ServiceError> {
        let accounts: Vec<Account> = uow.select(Filter::new().eq("role_id", id)).await?;
        for mut account in accounts {
            account.role_id = None;
            uow.update(&account).await?;
        }
        Ok(())
    }

    async fn committed(&self, _operation: Operation) -> Result<(), ServiceError> {
        self.authorization.refresh().await?;
        Ok(())
    }
}

/// Role workflow: CRUD plus the privilege tree used to edit grants
pub struct RoleService<S: Store> {
    generic: GenericService<S, Role, RoleView>,
    validator: Arc<RoleValidator<S>>,
    resources: Arc<Resources>,
}

impl<S: Store> RoleService<S> {
    pub fn new(store: S, authorization: Authorization, resources: Arc<Resources>) -> Self {
        let steps = Arc::new(RolePersistence { authorization });
        Self {
            generic: GenericService::new(store.clone(), steps),
            validator: Arc::new(RoleValidator::new(store)),
            resources,
        }
    }

    fn store(&self) -> &S {
        self.generic.store()
    }

    /// Roles ordered by name, without trees
    pub async fn get_views(&self) -> Result<Vec<RoleView>, ServiceError> {
        let mut views = self.generic.get_views().await?;
        views.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(views)
    }

    pub async fn get_view(&self, id: Uuid) -> Result<RoleView, ServiceError> {
        let mut view = self.generic.get_view(id).await?;
        self.seed_privileges_tree(&mut view).await?;
        Ok(view)
    }

    /// Blank role with the full tree, for the create form
    pub async fn new_view(&self) -> Result<RoleView, ServiceError> {
        let mut view = RoleView::default();
        self.seed_privileges_tree(&mut view).await?;
        Ok(view)
    }

    /// Replace the view's tree with one built from the store, selecting the
    /// privileges currently linked to the role
    pub async fn seed_privileges_tree(&self, view: &mut RoleView) -> Result<(), ServiceError> {
        let privileges: Vec<Privilege> = self.store().select(Filter::new()).await?;
        let links: Vec<RolePrivilege> = self
            .store()
            .select(Filter::new().eq("role_id", view.id))
            .await?;
        let selected_ids = links.into_iter().map(|link| link.privilege_id).collect();

        view.privileges_tree = build_privilege_tree(&privileges, selected_ids, &self.resources);
        Ok(())
    }

    pub async fn create(&self, mut view: RoleView) -> Result<RoleView, ServiceError> {
        view.id = Uuid::new_v4();
        self.validator.can_create(&view).await?;
        let id = self.generic.create(&view).await?;
        self.get_view(id).await
    }

    pub async fn edit(&self, id: Uuid, mut view: RoleView) -> Result<RoleView, ServiceError> {
        view.id = id;
        self.validator.can_edit(&view).await?;
        self.generic.edit(&view).await?;
        self.get_view(id).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        self.validator.can_delete(id).await?;
        self.generic.delete(id).await
    }
}

impl<S: Store> Clone for RoleService<S> {
    fn clone(&self) -> Self {
        Self {
            generic: self.generic.clone(),
            validator: self.validator.clone(),
            resources: self.resources.clone(),
        }
    }
}
