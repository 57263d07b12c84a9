use axum::{extract::State, Extension};
use serde::Serialize;
use uuid::Uuid;

use crate::app::AppState;
use crate::database::models::PrivilegeKey;
use crate::database::Store;
use crate::middleware::{ApiResponse, ApiResult, AuthAccount};

#[derive(Debug, Serialize)]
pub struct Permissions {
    pub account_id: Uuid,
    pub permitted: Vec<PrivilegeKey>,
}

/// GET /account/permissions - what the caller may do, for menu rendering
pub async fn show<S: Store>(
    State(state): State<AppState<S>>,
    Extension(account): Extension<AuthAccount>,
) -> ApiResult<Permissions> {
    Ok(ApiResponse::success(Permissions {
        account_id: account.account_id,
        permitted: state.authorization.permitted_actions(account.account_id),
    }))
}
