#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde_json::Value;
use uuid::Uuid;

use sentinel_admin::app::{app, AppState};
use sentinel_admin::auth::{generate_jwt, Claims};
use sentinel_admin::database::models::{Privilege, PrivilegeKey};
use sentinel_admin::database::MemoryStore;
use sentinel_admin::resources::Resources;
use sentinel_admin::views::{AccountView, RoleView};

/// The full router over an in-memory store, served on an ephemeral port
pub struct TestApp {
    pub base_url: String,
    pub state: AppState<MemoryStore>,
    client: reqwest::Client,
}

impl TestApp {
    pub async fn spawn() -> Result<Self> {
        Self::spawn_with(true).await
    }

    pub async fn spawn_with(authorization_enabled: bool) -> Result<Self> {
        let resources = Arc::new(Resources::load(None)?);
        let state = AppState::build(MemoryStore::new(), resources, authorization_enabled).await?;

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .context("failed to bind test listener")?;
        let base_url = format!("http://{}", listener.local_addr()?);

        let router = app(state.clone());
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        // The gate answers denials with redirects; tests inspect them directly
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        Ok(Self {
            base_url,
            state,
            client,
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let builder = self.client.request(method, self.url(path));
        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    pub fn get(&self, path: &str, token: &str) -> RequestBuilder {
        self.request(Method::GET, path, Some(token))
    }

    pub fn token(&self, account_id: Uuid) -> Result<String> {
        Ok(generate_jwt(&Claims::new(account_id))?)
    }

    /// Id of a seeded privilege
    pub async fn privilege(&self, area: Option<&str>, controller: &str, action: &str) -> Result<Uuid> {
        let key = PrivilegeKey::new(area, controller, action);
        let privileges: Vec<Privilege> = self.state.privileges.list().await?;
        privileges
            .into_iter()
            .find(|privilege| privilege.key() == key)
            .map(|privilege| privilege.id)
            .with_context(|| format!("privilege {} not seeded", key))
    }

    pub async fn role(&self, name: &str, privileges: &[(Option<&str>, &str, &str)]) -> Result<RoleView> {
        let mut view = RoleView {
            name: name.to_string(),
            ..RoleView::default()
        };
        for (area, controller, action) in privileges {
            view.privileges_tree
                .selected_ids
                .push(self.privilege(*area, controller, action).await?);
        }
        Ok(self.state.roles.create(view).await?)
    }

    pub async fn account(&self, username: &str, role_id: Option<Uuid>) -> Result<AccountView> {
        let email = format!("{}@example.com", username);
        Ok(self.state.accounts.create(username, &email, role_id).await?)
    }

    /// An account holding a fresh role with exactly `privileges`, and its token
    pub async fn account_with(&self, username: &str, privileges: &[(Option<&str>, &str, &str)]) -> Result<(AccountView, String)> {
        let role = self.role(&format!("{} role", username), privileges).await?;
        let account = self.account(username, Some(role.id)).await?;
        let token = self.token(account.id)?;
        Ok((account, token))
    }
}

pub const ADMIN: Option<&str> = Some("Administration");

/// Every catalogued privilege
pub const ALL: &[(Option<&str>, &str, &str)] = &[
    (ADMIN, "Roles", "Index"),
    (ADMIN, "Roles", "Create"),
    (ADMIN, "Roles", "Details"),
    (ADMIN, "Roles", "Edit"),
    (ADMIN, "Roles", "Delete"),
    (ADMIN, "Accounts", "Index"),
    (ADMIN, "Accounts", "Details"),
    (ADMIN, "Accounts", "Edit"),
    (ADMIN, "Accounts", "Delete"),
    (ADMIN, "Privileges", "Index"),
    (None, "Account", "Permissions"),
];

/// Read the `data` member of a success envelope
pub async fn data(response: reqwest::Response, expected: StatusCode) -> Result<Value> {
    let status = response.status();
    let body: Value = response.json().await?;
    anyhow::ensure!(status == expected, "expected {}, got {}: {}", expected, status, body);
    anyhow::ensure!(body["success"] == true, "not a success envelope: {}", body);
    Ok(body["data"].clone())
}

pub fn ids(values: &Value) -> Vec<Uuid> {
    values
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.as_str().and_then(|s| s.parse().ok()))
                .collect()
        })
        .unwrap_or_default()
}
