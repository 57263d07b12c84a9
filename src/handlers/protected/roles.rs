use axum::{
    extract::{Path, State},
    Extension, Json,
};
use uuid::Uuid;

use super::audit;
use crate::app::AppState;
use crate::database::Store;
use crate::middleware::{ApiResponse, ApiResult, AuthAccount};
use crate::views::RoleView;

/// GET /administration/roles
pub async fn index<S: Store>(State(state): State<AppState<S>>) -> ApiResult<Vec<RoleView>> {
    Ok(ApiResponse::success(state.roles.get_views().await?))
}

/// GET /administration/roles/new - blank role with every privilege unselected
pub async fn new<S: Store>(State(state): State<AppState<S>>) -> ApiResult<RoleView> {
    Ok(ApiResponse::success(state.roles.new_view().await?))
}

/// POST /administration/roles
pub async fn create<S: Store>(
    State(state): State<AppState<S>>,
    Extension(actor): Extension<AuthAccount>,
    Json(view): Json<RoleView>,
) -> ApiResult<RoleView> {
    let role = state.roles.create(view).await?;
    audit(&state, actor, format!("Created role '{}'", role.name)).await;
    Ok(ApiResponse::created(role))
}

/// GET /administration/roles/:id
pub async fn show<S: Store>(
    State(state): State<AppState<S>>,
    Path(id): Path<Uuid>,
) -> ApiResult<RoleView> {
    Ok(ApiResponse::success(state.roles.get_view(id).await?))
}

/// PUT /administration/roles/:id
pub async fn update<S: Store>(
    State(state): State<AppState<S>>,
    Extension(actor): Extension<AuthAccount>,
    Path(id): Path<Uuid>,
    Json(view): Json<RoleView>,
) -> ApiResult<RoleView> {
    let role = state.roles.edit(id, view).await?;
    audit(&state, actor, format!("Edited role '{}'", role.name)).await;
    Ok(ApiResponse::success(role))
}

/// DELETE /administration/roles/:id
pub async fn delete<S: Store>(
    State(state): State<AppState<S>>,
    Extension(actor): Extension<AuthAccount>,
    Path(id): Path<Uuid>,
) -> ApiResult<()> {
    let role = state.roles.get_view(id).await?;
    state.roles.delete(id).await?;
    audit(&state, actor, format!("Deleted role '{}'", role.name)).await;
    Ok(ApiResponse::<()>::no_content())
}
