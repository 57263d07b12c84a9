mod common;

use anyhow::Result;
use reqwest::{Method, StatusCode};
use serde_json::{json, Value};
use uuid::Uuid;

use common::{data, TestApp, ADMIN, ALL};

#[tokio::test]
async fn assigning_a_role_grants_access() -> Result<()> {
    let app = TestApp::spawn().await?;
    let (_, admin) = app.account_with("admin", ALL).await?;
    let viewers = app.role("Viewers", &[(ADMIN, "Accounts", "Index")]).await?;
    let newcomer = app.account("newcomer", None).await?;
    let token = app.token(newcomer.id)?;

    let res = app.get("/administration/accounts", &token).send().await?;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);

    let res = app
        .request(Method::PUT, &format!("/administration/accounts/{}", newcomer.id), Some(&admin))
        .json(&json!({ "role_id": viewers.id }))
        .send()
        .await?;
    let edited = data(res, StatusCode::OK).await?;
    assert_eq!(edited["role_name"], "Viewers");

    let res = app.get("/administration/accounts", &token).send().await?;
    let accounts = data(res, StatusCode::OK).await?;
    // Newest first
    assert_eq!(accounts[0]["username"], "newcomer");
    Ok(())
}

#[tokio::test]
async fn assigning_a_missing_role_is_rejected() -> Result<()> {
    let app = TestApp::spawn().await?;
    let (admin_account, admin) = app.account_with("admin", ALL).await?;

    let res = app
        .request(
            Method::PUT,
            &format!("/administration/accounts/{}", admin_account.id),
            Some(&admin),
        )
        .json(&json!({ "role_id": Uuid::new_v4() }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    assert!(body["field_errors"]["role_id"].is_string());

    let res = app
        .get(&format!("/administration/accounts/{}", Uuid::new_v4()), &admin)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn privileges_index_lists_the_catalogue() -> Result<()> {
    let app = TestApp::spawn().await?;
    let (_, token) = app.account_with("admin", ALL).await?;

    let res = app.get("/administration/privileges", &token).send().await?;
    let privileges = data(res, StatusCode::OK).await?;
    assert_eq!(privileges.as_array().map(Vec::len), Some(ALL.len()));
    assert_eq!(privileges[0]["controller"], "Account");
    Ok(())
}

#[tokio::test]
async fn deleting_an_account_is_gated_and_audited() -> Result<()> {
    let app = TestApp::spawn().await?;
    let (admin_account, admin) = app.account_with("admin", ALL).await?;
    let (_, clerk) = app.account_with("clerk", &[(ADMIN, "Accounts", "Index")]).await?;
    let leaving = app.account("leaving", None).await?;
    let path = format!("/administration/accounts/{}", leaving.id);

    let res = app.request(Method::DELETE, &path, Some(&clerk)).send().await?;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);

    let res = app.request(Method::DELETE, &path, Some(&admin)).send().await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = app.get(&path, &admin).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = app.request(Method::DELETE, &path, Some(&admin)).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let entries = app.state.audit.entries_for(admin_account.id).await?;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].message, "Deleted account 'leaving'");
    Ok(())
}

#[tokio::test]
async fn role_assignments_are_audited() -> Result<()> {
    let app = TestApp::spawn().await?;
    let (admin_account, admin) = app.account_with("admin", ALL).await?;
    let viewers = app.role("Viewers", &[]).await?;
    let newcomer = app.account("newcomer", None).await?;

    let res = app
        .request(Method::PUT, &format!("/administration/accounts/{}", newcomer.id), Some(&admin))
        .json(&json!({ "role_id": viewers.id }))
        .send()
        .await?;
    data(res, StatusCode::OK).await?;

    let entries = app.state.audit.entries().await?;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].account_id, Some(admin_account.id));
    assert_eq!(entries[0].message, "Assigned role 'Viewers' to account 'newcomer'");
    Ok(())
}
