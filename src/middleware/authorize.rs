use std::sync::Arc;

use axum::{
    extract::{MatchedPath, Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::error::ApiError;
use crate::middleware::auth::AuthAccount;
use crate::security::{ActionCatalogue, Authorization};

/// Where denied requests are sent
pub const UNAUTHORIZED_PATH: &str = "/home/unauthorized";

/// State for the authorization gate
#[derive(Clone, Debug)]
pub struct AuthorizationGate {
    pub authorization: Authorization,
    pub catalogue: Arc<ActionCatalogue>,
}

impl AuthorizationGate {
    pub fn new(authorization: Authorization, catalogue: Arc<ActionCatalogue>) -> Self {
        Self {
            authorization,
            catalogue,
        }
    }
}

/// Runs after JWT authentication. Resolves the matched route to its
/// (area, controller, action) triple and lets the request through only when
/// the account holds that privilege; otherwise redirects to the unauthorized page.
pub async fn authorize_middleware(
    State(gate): State<AuthorizationGate>,
    request: Request,
    next: Next,
) -> Result<Response, Response> {
    let account = request
        .extensions()
        .get::<AuthAccount>()
        .copied()
        .ok_or_else(|| ApiError::unauthorized("Authentication required").into_response())?;

    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|matched| matched.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());

    let Some(action) = gate.catalogue.resolve(request.method(), &path) else {
        tracing::warn!("No catalogued action for {} {}", request.method(), path);
        return Err(ApiError::forbidden("Action is not registered").into_response());
    };

    if !gate.authorization.is_authorized_for(
        account.account_id,
        action.area,
        action.controller,
        action.action,
    ) {
        tracing::info!(
            "Account {} denied {} ({} {})",
            account.account_id,
            action.key(),
            request.method(),
            path
        );
        return Err(Redirect::to(UNAUTHORIZED_PATH).into_response());
    }

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{header, Method, StatusCode},
        middleware::{from_fn, from_fn_with_state},
        routing::get,
        Router,
    };
    use tower::ServiceExt;
    use uuid::Uuid;

    use crate::database::models::PrivilegeKey;
    use crate::database::DatabaseError;
    use crate::security::{RoleProvider, RouteAction};

    use super::*;

    const ALLOWED: Uuid = Uuid::from_u128(7);

    struct OnlyDetails;

    #[async_trait]
    impl RoleProvider for OnlyDetails {
        fn is_authorized_for(
            &self,
            account_id: Uuid,
            area: Option<&str>,
            controller: &str,
            action: &str,
        ) -> bool {
            account_id == ALLOWED && area == Some("Test") && controller == "Things" && action == "Details"
        }

        fn permitted_actions(&self, _: Uuid) -> Vec<PrivilegeKey> {
            Vec::new()
        }

        async fn refresh(&self) -> Result<(), DatabaseError> {
            Ok(())
        }
    }

    async fn inject_account(mut request: Request, next: Next) -> Response {
        let account = request
            .headers()
            .get("x-account")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse::<Uuid>().ok());
        if let Some(account_id) = account {
            request.extensions_mut().insert(AuthAccount { account_id });
        }
        next.run(request).await
    }

    fn router(authorization: Authorization) -> Router {
        let catalogue = ActionCatalogue::new(vec![
            RouteAction {
                method: Method::GET,
                path: "/things/:id",
                area: Some("Test"),
                controller: "Things",
                action: "Details",
            },
            RouteAction {
                method: Method::DELETE,
                path: "/things/:id",
                area: Some("Test"),
                controller: "Things",
                action: "Delete",
            },
        ]);
        let gate = AuthorizationGate::new(authorization, Arc::new(catalogue));

        Router::new()
            .route("/things/:id", get(|| async { "thing" }).delete(|| async { "gone" }))
            .route("/untracked", get(|| async { "untracked" }))
            .route_layer(from_fn_with_state(gate, authorize_middleware))
            .route_layer(from_fn(inject_account))
    }

    fn request(method: Method, uri: &str, account: Option<Uuid>) -> Request {
        let mut builder = axum::http::Request::builder().method(method).uri(uri);
        if let Some(account) = account {
            builder = builder.header("x-account", account.to_string());
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn permitted_request_reaches_handler() {
        let app = router(Authorization::new(Arc::new(OnlyDetails)));
        let response = app
            .oneshot(request(Method::GET, "/things/42", Some(ALLOWED)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn denied_request_is_redirected() {
        let app = router(Authorization::new(Arc::new(OnlyDetails)));

        for (method, account) in [
            (Method::DELETE, ALLOWED),
            (Method::GET, Uuid::new_v4()),
        ] {
            let response = app
                .clone()
                .oneshot(request(method, "/things/42", Some(account)))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::SEE_OTHER);
            assert_eq!(
                response.headers()[header::LOCATION].to_str().unwrap(),
                UNAUTHORIZED_PATH
            );
        }
    }

    #[tokio::test]
    async fn missing_account_is_unauthenticated() {
        let app = router(Authorization::new(Arc::new(OnlyDetails)));
        let response = app
            .oneshot(request(Method::GET, "/things/42", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn uncatalogued_route_is_forbidden() {
        let app = router(Authorization::unconfigured());
        let response = app
            .oneshot(request(Method::GET, "/untracked", Some(ALLOWED)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn unconfigured_authorization_lets_everything_through() {
        let app = router(Authorization::unconfigured());
        let response = app
            .oneshot(request(Method::DELETE, "/things/42", Some(Uuid::new_v4())))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
