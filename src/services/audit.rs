use uuid::Uuid;

use crate::database::models::Log;
use crate::database::{Filter, Store, UnitOfWork};
use crate::services::error::ServiceError;

/// Persists one log row per administrative change
#[derive(Clone)]
pub struct AuditLog<S: Store> {
    store: S,
}

impl<S: Store> AuditLog<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn log(
        &self,
        account_id: Option<Uuid>,
        message: impl Into<String>,
    ) -> Result<(), ServiceError> {
        let entry = Log::new(account_id, message);
        tracing::info!(account_id = ?entry.account_id, "{}", entry.message);

        let mut uow = self.store.begin().await?;
        uow.insert(&entry).await?;
        uow.commit().await?;
        Ok(())
    }

    /// Newest first
    pub async fn entries(&self) -> Result<Vec<Log>, ServiceError> {
        let mut entries: Vec<Log> = self.store.select(Filter::new()).await?;
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(entries)
    }

    pub async fn entries_for(&self, account_id: Uuid) -> Result<Vec<Log>, ServiceError> {
        let mut entries: Vec<Log> = self
            .store
            .select(Filter::new().eq("account_id", account_id))
            .await?;
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(entries)
    }
}
