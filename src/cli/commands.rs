use std::sync::Arc;

use anyhow::{bail, Context};
use serde_json::json;
use uuid::Uuid;

use crate::auth::{generate_jwt, Claims};
use crate::cli::utils::{output_rows, output_success};
use crate::cli::OutputFormat;
use crate::config;
use crate::database::models::{Account, Privilege, Role, RolePrivilege};
use crate::database::{DatabaseManager, Filter, PgStore, Store};
use crate::resources::Resources;
use crate::security::{ActionCatalogue, Authorization, AuthorizationProvider};
use crate::services::{AccountService, AuditLog, PrivilegeService, RoleService};
use crate::views::RoleView;

async fn connect() -> anyhow::Result<PgStore> {
    DatabaseManager::connect(&config::config().database)
        .await
        .context("failed to connect to the database")
}

/// Authorization backed by the store, so service writes keep the usual refresh path
fn authorization(store: &PgStore) -> Authorization {
    Authorization::new(Arc::new(AuthorizationProvider::new(store.clone())))
}

pub async fn migrate(output_format: OutputFormat) -> anyhow::Result<()> {
    let store = connect().await?;
    DatabaseManager::migrate(&store).await?;
    output_success(output_format, "Migrations applied", None)
}

pub async fn seed(output_format: OutputFormat) -> anyhow::Result<()> {
    let store = connect().await?;
    let inserted = PrivilegeService::new(store)
        .seed(&ActionCatalogue::standard().privileges())
        .await?;
    output_success(
        output_format,
        &format!("Seeded {} privileges", inserted),
        Some(json!({ "inserted": inserted })),
    )
}

pub async fn bootstrap(
    role_name: &str,
    username: &str,
    email: &str,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    let store = connect().await?;
    PrivilegeService::new(store.clone())
        .seed(&ActionCatalogue::standard().privileges())
        .await?;

    let authorization = authorization(&store);
    let roles = RoleService::new(
        store.clone(),
        authorization.clone(),
        Arc::new(Resources::default()),
    );
    let accounts = AccountService::new(store.clone(), authorization);

    let privileges: Vec<Privilege> = store.select(Filter::new()).await?;
    let mut view = RoleView {
        name: role_name.to_string(),
        ..RoleView::default()
    };
    view.privileges_tree.selected_ids = privileges.iter().map(|privilege| privilege.id).collect();

    let existing = store
        .select::<Role>(Filter::new())
        .await?
        .into_iter()
        .find(|role| role.name.eq_ignore_ascii_case(role_name.trim()));
    let role = match existing {
        Some(role) => roles.edit(role.id, view).await?,
        None => roles.create(view).await?,
    };

    let account = accounts.create(username, email, Some(role.id)).await?;
    AuditLog::new(store.clone())
        .log(
            None,
            format!("Bootstrapped account '{}' with role '{}'", account.username, role.name),
        )
        .await?;
    let token = generate_jwt(&Claims::new(account.id))?;

    output_success(
        output_format,
        &format!(
            "Account '{}' ({}) holds role '{}' with {} privileges\nToken: {}",
            account.username,
            account.id,
            role.name,
            role.privileges_tree.selected_ids.len(),
            token
        ),
        Some(json!({
            "account_id": account.id,
            "role_id": role.id,
            "token": token,
        })),
    )
}

pub async fn token(account_id: Uuid, output_format: OutputFormat) -> anyhow::Result<()> {
    let store = connect().await?;
    if store.find::<Account>(account_id).await?.is_none() {
        bail!("Account {} not found", account_id);
    }

    let token = generate_jwt(&Claims::new(account_id))?;
    match output_format {
        OutputFormat::Text => {
            println!("{}", token);
            Ok(())
        }
        OutputFormat::Json => output_success(
            output_format,
            "Token generated",
            Some(json!({ "token": token })),
        ),
    }
}

pub async fn roles(output_format: OutputFormat) -> anyhow::Result<()> {
    let store = connect().await?;
    let roles = RoleService::new(
        store.clone(),
        authorization(&store),
        Arc::new(Resources::default()),
    )
    .get_views()
    .await?;

    let mut rows = Vec::with_capacity(roles.len());
    for role in roles {
        let links: Vec<RolePrivilege> = store
            .select(Filter::new().eq("role_id", role.id))
            .await?;
        rows.push((
            format!("{}  {}  ({} privileges)", role.id, role.name, links.len()),
            json!({ "id": role.id, "name": role.name, "privileges": links.len() }),
        ));
    }
    output_rows(output_format, "roles", &rows)
}
