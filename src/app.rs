use std::sync::Arc;

use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::get,
    Router,
};
use tower_http::trace::TraceLayer;

use crate::database::Store;
use crate::handlers::{protected, public};
use crate::middleware::{
    authorize_middleware, jwt_auth_middleware, AuthorizationGate, UNAUTHORIZED_PATH,
};
use crate::resources::Resources;
use crate::security::{routes, ActionCatalogue, Authorization, AuthorizationProvider};
use crate::services::{AccountService, AuditLog, PrivilegeService, RoleService, ServiceError};

/// Shared state handed to every handler
pub struct AppState<S: Store> {
    pub store: S,
    pub authorization: Authorization,
    pub resources: Arc<Resources>,
    pub catalogue: Arc<ActionCatalogue>,
    pub roles: RoleService<S>,
    pub accounts: AccountService<S>,
    pub privileges: PrivilegeService<S>,
    pub audit: AuditLog<S>,
}

impl<S: Store> AppState<S> {
    pub fn new(
        store: S,
        authorization: Authorization,
        resources: Arc<Resources>,
        catalogue: Arc<ActionCatalogue>,
    ) -> Self {
        Self {
            roles: RoleService::new(store.clone(), authorization.clone(), resources.clone()),
            accounts: AccountService::new(store.clone(), authorization.clone()),
            privileges: PrivilegeService::new(store.clone()),
            audit: AuditLog::new(store.clone()),
            store,
            authorization,
            resources,
            catalogue,
        }
    }

    /// Seed the catalogued privileges and load the authorization snapshot
    pub async fn build(
        store: S,
        resources: Arc<Resources>,
        authorization_enabled: bool,
    ) -> Result<Self, ServiceError> {
        let catalogue = Arc::new(ActionCatalogue::standard());
        PrivilegeService::new(store.clone())
            .seed(&catalogue.privileges())
            .await?;

        let authorization = if authorization_enabled {
            let provider = AuthorizationProvider::load(store.clone()).await?;
            Authorization::new(Arc::new(provider))
        } else {
            Authorization::unconfigured()
        };

        Ok(Self::new(store, authorization, resources, catalogue))
    }
}

impl<S: Store> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            authorization: self.authorization.clone(),
            resources: self.resources.clone(),
            catalogue: self.catalogue.clone(),
            roles: self.roles.clone(),
            accounts: self.accounts.clone(),
            privileges: self.privileges.clone(),
            audit: self.audit.clone(),
        }
    }
}

pub fn app<S: Store>(state: AppState<S>) -> Router {
    Router::new()
        // Public
        .route("/", get(public::root))
        .route("/health", get(public::health::<S>))
        .route(UNAUTHORIZED_PATH, get(public::unauthorized))
        // Authenticated and gated
        .merge(protected_routes(&state))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn protected_routes<S: Store>(state: &AppState<S>) -> Router<AppState<S>> {
    use protected::{accounts, permissions, privileges, roles};

    let gate = AuthorizationGate::new(state.authorization.clone(), state.catalogue.clone());

    Router::new()
        .route(routes::ROLES, get(roles::index::<S>).post(roles::create::<S>))
        .route(routes::ROLE_NEW, get(roles::new::<S>))
        .route(
            routes::ROLE,
            get(roles::show::<S>)
                .put(roles::update::<S>)
                .delete(roles::delete::<S>),
        )
        .route(routes::ACCOUNTS, get(accounts::index::<S>))
        .route(
            routes::ACCOUNT,
            get(accounts::show::<S>)
                .put(accounts::update::<S>)
                .delete(accounts::delete::<S>),
        )
        .route(routes::PRIVILEGES, get(privileges::index::<S>))
        .route(routes::PERMISSIONS, get(permissions::show::<S>))
        // Layers run last-added first: authenticate, then authorize
        .route_layer(from_fn_with_state(gate, authorize_middleware))
        .route_layer(from_fn(jwt_auth_middleware))
}
