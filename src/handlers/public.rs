use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::app::AppState;
use crate::database::Store;
use crate::error::ApiError;

/// GET / - service description
pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Sentinel Admin",
            "version": version,
            "description": "Role-based administration API",
            "endpoints": {
                "health": "/health (public)",
                "roles": "/administration/roles[/:id] (protected)",
                "accounts": "/administration/accounts[/:id] (protected)",
                "privileges": "/administration/privileges (protected)",
                "permissions": "/account/permissions (protected)",
            }
        }
    }))
}

/// GET /health - store connectivity
pub async fn health<S: Store>(State(state): State<AppState<S>>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok",
                    "authorization": state.authorization.is_configured(),
                }
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": "database unavailable",
                    "data": {
                        "status": "degraded",
                        "timestamp": now,
                    }
                })),
            )
        }
    }
}

/// GET /home/unauthorized - target of denied requests
pub async fn unauthorized() -> ApiError {
    ApiError::forbidden("You are not authorized to perform this action")
}
