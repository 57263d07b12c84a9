use std::collections::{HashMap, HashSet};
use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use uuid::Uuid;

use crate::database::models::{Account, Privilege, PrivilegeKey, RolePrivilege};
use crate::database::{DatabaseError, Filter, Store};

/// Answers whether an account may invoke an action
#[async_trait]
pub trait RoleProvider: Send + Sync {
    fn is_authorized_for(
        &self,
        account_id: Uuid,
        area: Option<&str>,
        controller: &str,
        action: &str,
    ) -> bool;

    /// Every privilege the account currently holds
    fn permitted_actions(&self, account_id: Uuid) -> Vec<PrivilegeKey>;

    /// Reload role assignments and role grants from the store
    async fn refresh(&self) -> Result<(), DatabaseError>;
}

/// Immutable index of account roles and role grants
#[derive(Debug, Default)]
pub struct PrivilegeIndex {
    account_roles: HashMap<Uuid, Uuid>,
    role_privileges: HashMap<Uuid, HashSet<PrivilegeKey>>,
}

impl PrivilegeIndex {
    pub fn build(accounts: &[Account], privileges: &[Privilege], links: &[RolePrivilege]) -> Self {
        let account_roles = accounts
            .iter()
            .filter_map(|account| account.role_id.map(|role_id| (account.id, role_id)))
            .collect();

        let keys: HashMap<Uuid, PrivilegeKey> = privileges
            .iter()
            .map(|privilege| (privilege.id, privilege.key()))
            .collect();

        let mut role_privileges: HashMap<Uuid, HashSet<PrivilegeKey>> = HashMap::new();
        for link in links {
            if let Some(key) = keys.get(&link.privilege_id) {
                role_privileges
                    .entry(link.role_id)
                    .or_default()
                    .insert(key.clone());
            }
        }

        Self {
            account_roles,
            role_privileges,
        }
    }

    pub fn is_authorized_for(
        &self,
        account_id: Uuid,
        area: Option<&str>,
        controller: &str,
        action: &str,
    ) -> bool {
        self.account_roles
            .get(&account_id)
            .and_then(|role_id| self.role_privileges.get(role_id))
            .map(|granted| granted.contains(&PrivilegeKey::new(area, controller, action)))
            .unwrap_or(false)
    }

    pub fn permitted_actions(&self, account_id: Uuid) -> Vec<PrivilegeKey> {
        let mut keys: Vec<PrivilegeKey> = self
            .account_roles
            .get(&account_id)
            .and_then(|role_id| self.role_privileges.get(role_id))
            .map(|granted| granted.iter().cloned().collect())
            .unwrap_or_default();
        keys.sort();
        keys
    }

    pub fn role_count(&self) -> usize {
        self.role_privileges.len()
    }

    pub fn account_count(&self) -> usize {
        self.account_roles.len()
    }
}

/// Store-backed provider. Checks read the current snapshot; `refresh` builds a
/// new snapshot and swaps it in, so readers never wait for a reload.
pub struct AuthorizationProvider<S: Store> {
    store: S,
    snapshot: RwLock<Arc<PrivilegeIndex>>,
}

impl<S: Store> AuthorizationProvider<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            snapshot: RwLock::new(Arc::new(PrivilegeIndex::default())),
        }
    }

    /// Create and fill from the store
    pub async fn load(store: S) -> Result<Self, DatabaseError> {
        let provider = Self::new(store);
        provider.refresh().await?;
        Ok(provider)
    }

    pub fn snapshot(&self) -> Arc<PrivilegeIndex> {
        self.snapshot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl<S: Store> RoleProvider for AuthorizationProvider<S> {
    fn is_authorized_for(
        &self,
        account_id: Uuid,
        area: Option<&str>,
        controller: &str,
        action: &str,
    ) -> bool {
        self.snapshot()
            .is_authorized_for(account_id, area, controller, action)
    }

    fn permitted_actions(&self, account_id: Uuid) -> Vec<PrivilegeKey> {
        self.snapshot().permitted_actions(account_id)
    }

    async fn refresh(&self) -> Result<(), DatabaseError> {
        let accounts: Vec<Account> = self.store.select(Filter::new()).await?;
        let privileges: Vec<Privilege> = self.store.select(Filter::new()).await?;
        let links: Vec<RolePrivilege> = self.store.select(Filter::new()).await?;

        let index = Arc::new(PrivilegeIndex::build(&accounts, &privileges, &links));
        tracing::debug!(
            "Authorization snapshot rebuilt: {} roles, {} accounts with roles",
            index.role_count(),
            index.account_count()
        );

        *self
            .snapshot
            .write()
            .unwrap_or_else(PoisonError::into_inner) = index;
        Ok(())
    }
}
