use axum::extract::State;

use crate::app::AppState;
use crate::database::models::Privilege;
use crate::database::Store;
use crate::middleware::{ApiResponse, ApiResult};

/// GET /administration/privileges
pub async fn index<S: Store>(State(state): State<AppState<S>>) -> ApiResult<Vec<Privilege>> {
    Ok(ApiResponse::success(state.privileges.list().await?))
}
