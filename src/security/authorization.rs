use std::sync::Arc;

use uuid::Uuid;

use crate::database::models::PrivilegeKey;
use crate::database::DatabaseError;
use crate::security::provider::RoleProvider;

/// Authorization handle carried in application state.
///
/// Without a provider every check succeeds. That mode exists only for
/// deployments that switch authorization off explicitly, and configuration
/// validation refuses it in production.
#[derive(Clone)]
pub struct Authorization {
    provider: Option<Arc<dyn RoleProvider>>,
}

impl Authorization {
    pub fn new(provider: Arc<dyn RoleProvider>) -> Self {
        Self {
            provider: Some(provider),
        }
    }

    pub fn unconfigured() -> Self {
        tracing::warn!("No authorization provider configured: every action is permitted");
        Self { provider: None }
    }

    pub fn is_configured(&self) -> bool {
        self.provider.is_some()
    }

    pub fn is_authorized_for(
        &self,
        account_id: Uuid,
        area: Option<&str>,
        controller: &str,
        action: &str,
    ) -> bool {
        match &self.provider {
            Some(provider) => provider.is_authorized_for(account_id, area, controller, action),
            None => true,
        }
    }

    /// Privileges held by the account; empty when unconfigured
    pub fn permitted_actions(&self, account_id: Uuid) -> Vec<PrivilegeKey> {
        self.provider
            .as_ref()
            .map(|provider| provider.permitted_actions(account_id))
            .unwrap_or_default()
    }

    pub async fn refresh(&self) -> Result<(), DatabaseError> {
        match &self.provider {
            Some(provider) => provider.refresh().await,
            None => Ok(()),
        }
    }
}

impl std::fmt::Debug for Authorization {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authorization")
            .field("configured", &self.is_configured())
            .finish()
    }
}
