use crate::database::models::{Privilege, PrivilegeKey};
use crate::database::{Filter, Store, UnitOfWork};
use crate::services::error::ServiceError;

#[derive(Clone)]
pub struct PrivilegeService<S: Store> {
    store: S,
}

impl<S: Store> PrivilegeService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// All privileges ordered by area, controller, action; global ones first
    pub async fn list(&self) -> Result<Vec<Privilege>, ServiceError> {
        let mut privileges: Vec<Privilege> = self.store.select(Filter::new()).await?;
        privileges.sort_by(|a, b| a.key().cmp(&b.key()));
        Ok(privileges)
    }

    /// Insert the triples not yet stored. Returns how many were added.
    pub async fn seed(&self, keys: &[PrivilegeKey]) -> Result<usize, ServiceError> {
        let mut uow = self.store.begin().await?;
        let existing: Vec<Privilege> = uow.select(Filter::new()).await?;

        let mut inserted = 0;
        for key in keys {
            let present = existing
                .iter()
                .any(|privilege| key.matches(privilege.area.as_deref(), &privilege.controller, &privilege.action));
            if present {
                continue;
            }
            uow.insert(&Privilege::new(key.area.as_deref(), &key.controller, &key.action))
                .await?;
            tracing::debug!("Seeded privilege {}", key);
            inserted += 1;
        }

        uow.commit().await?;
        if inserted > 0 {
            tracing::info!("Seeded {} privileges", inserted);
        }
        Ok(inserted)
    }
}

#[cfg(test)]
mod tests {
    use crate::database::MemoryStore;
    use crate::security::ActionCatalogue;

    use super::*;

    #[tokio::test]
    async fn seeding_is_idempotent() {
        let service = PrivilegeService::new(MemoryStore::new());
        let keys = ActionCatalogue::standard().privileges();

        assert_eq!(service.seed(&keys).await.unwrap(), keys.len());
        assert_eq!(service.seed(&keys).await.unwrap(), 0);
        assert_eq!(service.list().await.unwrap().len(), keys.len());
    }

    #[tokio::test]
    async fn list_puts_global_privileges_first() {
        let service = PrivilegeService::new(MemoryStore::new());
        service
            .seed(&[
                PrivilegeKey::new(Some("Administration"), "Roles", "Index"),
                PrivilegeKey::new(None, "Home", "Index"),
            ])
            .await
            .unwrap();

        let privileges = service.list().await.unwrap();
        assert_eq!(privileges[0].area, None);
        assert_eq!(privileges[1].controller, "Roles");
    }
}
