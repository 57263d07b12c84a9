use axum::{
    extract::{Path, State},
    Extension, Json,
};
use uuid::Uuid;

use super::audit;
use crate::app::AppState;
use crate::database::Store;
use crate::middleware::{ApiResponse, ApiResult, AuthAccount};
use crate::views::{AccountEditView, AccountView};

/// GET /administration/accounts
pub async fn index<S: Store>(State(state): State<AppState<S>>) -> ApiResult<Vec<AccountView>> {
    Ok(ApiResponse::success(state.accounts.get_views().await?))
}

/// GET /administration/accounts/:id
pub async fn show<S: Store>(
    State(state): State<AppState<S>>,
    Path(id): Path<Uuid>,
) -> ApiResult<AccountView> {
    Ok(ApiResponse::success(state.accounts.get_view(id).await?))
}

/// PUT /administration/accounts/:id - assign or clear the account's role
pub async fn update<S: Store>(
    State(state): State<AppState<S>>,
    Extension(actor): Extension<AuthAccount>,
    Path(id): Path<Uuid>,
    Json(edit): Json<AccountEditView>,
) -> ApiResult<AccountView> {
    let account = state.accounts.edit(id, edit).await?;
    let message = match &account.role_name {
        Some(role) => format!("Assigned role '{}' to account '{}'", role, account.username),
        None => format!("Cleared the role of account '{}'", account.username),
    };
    audit(&state, actor, message).await;
    Ok(ApiResponse::success(account))
}

/// DELETE /administration/accounts/:id
pub async fn delete<S: Store>(
    State(state): State<AppState<S>>,
    Extension(actor): Extension<AuthAccount>,
    Path(id): Path<Uuid>,
) -> ApiResult<()> {
    let account = state.accounts.get_view(id).await?;
    state.accounts.delete(id).await?;
    audit(&state, actor, format!("Deleted account '{}'", account.username)).await;
    Ok(ApiResponse::<()>::no_content())
}
