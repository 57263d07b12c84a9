use axum::http::Method;

use crate::database::models::PrivilegeKey;

/// Route templates shared by the router and the catalogue
pub mod routes {
    pub const ROLES: &str = "/administration/roles";
    pub const ROLE_NEW: &str = "/administration/roles/new";
    pub const ROLE: &str = "/administration/roles/:id";
    pub const ACCOUNTS: &str = "/administration/accounts";
    pub const ACCOUNT: &str = "/administration/accounts/:id";
    pub const PRIVILEGES: &str = "/administration/privileges";
    pub const PERMISSIONS: &str = "/account/permissions";
}

const ADMINISTRATION: Option<&str> = Some("Administration");

/// A gated route and the privilege it requires
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteAction {
    pub method: Method,
    pub path: &'static str,
    pub area: Option<&'static str>,
    pub controller: &'static str,
    pub action: &'static str,
}

impl RouteAction {
    const fn new(
        method: Method,
        path: &'static str,
        area: Option<&'static str>,
        controller: &'static str,
        action: &'static str,
    ) -> Self {
        Self {
            method,
            path,
            area,
            controller,
            action,
        }
    }

    pub fn key(&self) -> PrivilegeKey {
        PrivilegeKey::new(self.area, self.controller, self.action)
    }
}

const STANDARD: &[RouteAction] = &[
    RouteAction::new(Method::GET, routes::ROLES, ADMINISTRATION, "Roles", "Index"),
    RouteAction::new(Method::GET, routes::ROLE_NEW, ADMINISTRATION, "Roles", "Create"),
    RouteAction::new(Method::POST, routes::ROLES, ADMINISTRATION, "Roles", "Create"),
    RouteAction::new(Method::GET, routes::ROLE, ADMINISTRATION, "Roles", "Details"),
    RouteAction::new(Method::PUT, routes::ROLE, ADMINISTRATION, "Roles", "Edit"),
    RouteAction::new(Method::DELETE, routes::ROLE, ADMINISTRATION, "Roles", "Delete"),
    RouteAction::new(Method::GET, routes::ACCOUNTS, ADMINISTRATION, "Accounts", "Index"),
    RouteAction::new(Method::GET, routes::ACCOUNT, ADMINISTRATION, "Accounts", "Details"),
    RouteAction::new(Method::PUT, routes::ACCOUNT, ADMINISTRATION, "Accounts", "Edit"),
    RouteAction::new(Method::DELETE, routes::ACCOUNT, ADMINISTRATION, "Accounts", "Delete"),
    RouteAction::new(Method::GET, routes::PRIVILEGES, ADMINISTRATION, "Privileges", "Index"),
    RouteAction::new(Method::GET, routes::PERMISSIONS, None, "Account", "Permissions"),
];

/// Every gated action of the application. The gate resolves matched routes
/// through it and privilege seeding inserts its triples.
#[derive(Debug, Clone)]
pub struct ActionCatalogue {
    actions: Vec<RouteAction>,
}

impl ActionCatalogue {
    pub fn new(actions: Vec<RouteAction>) -> Self {
        Self { actions }
    }

    pub fn standard() -> Self {
        Self::new(STANDARD.to_vec())
    }

    pub fn actions(&self) -> &[RouteAction] {
        &self.actions
    }

    pub fn resolve(&self, method: &Method, path: &str) -> Option<&RouteAction> {
        self.actions
            .iter()
            .find(|action| &action.method == method && action.path == path)
    }

    /// Distinct privilege triples, in catalogue order
    pub fn privileges(&self) -> Vec<PrivilegeKey> {
        let mut keys: Vec<PrivilegeKey> = Vec::with_capacity(self.actions.len());
        for action in &self.actions {
            let key = action.key();
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
        keys
    }
}
