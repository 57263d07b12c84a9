pub mod accounts;
pub mod permissions;
pub mod privileges;
pub mod roles;

use crate::app::AppState;
use crate::database::Store;
use crate::middleware::AuthAccount;

/// Record a change made by `actor`. Failures are logged; the change is already committed.
async fn audit<S: Store>(state: &AppState<S>, actor: AuthAccount, message: String) {
    if let Err(e) = state.audit.log(Some(actor.account_id), message).await {
        tracing::error!("Failed to write audit log: {}", e);
    }
}
