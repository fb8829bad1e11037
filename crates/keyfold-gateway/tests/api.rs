// SPDX-FileCopyrightText: 2026 Keyfold Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end API tests driving the router directly, no socket involved.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use keyfold_auth::TokenSigner;
use keyfold_gateway::{GatewayState, router};
use keyfold_storage::Database;
use serde_json::{Value, json};
use tower::ServiceExt;

async fn test_app() -> (Router, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("api.db");
    let db = Database::open(db_path.to_str().unwrap(), true).await.unwrap();
    let signer = Arc::new(TokenSigner::new(
        *b"0123456789abcdef0123456789abcdef",
        7,
    ));
    (router(GatewayState { db, signer }), dir)
}

async fn send(
    app: &Router,
    method: &str,
    path: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method(method)
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = builder
        .body(Body::from(
            body.map(|b| b.to_string()).unwrap_or_else(|| "{}".to_string()),
        ))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

/// Register a user and return their bearer token.
async fn register(app: &Router, email: &str, password: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/v1/auth/register",
        None,
        Some(json!({ "email": email, "password": password, "salt": "c2FsdA" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "register failed: {body}");
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_is_public() {
    let (app, _dir) = test_app().await;
    let (status, body) = send(&app, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn register_returns_token_and_public_user_fields() {
    let (app, _dir) = test_app().await;
    let (status, body) = send(
        &app,
        "POST",
        "/v1/auth/register",
        None,
        Some(json!({ "email": "a@x.com", "password": "hunter22", "salt": "c2FsdA" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["token"].as_str().unwrap().contains('.'));
    assert_eq!(body["user"]["email"], "a@x.com");
    assert_eq!(body["user"]["salt"], "c2FsdA");
    assert!(body["user"].get("password_hash").is_none());
}

#[tokio::test]
async fn duplicate_registration_is_a_conflict() {
    let (app, _dir) = test_app().await;
    register(&app, "a@x.com", "hunter22").await;
    let (status, body) = send(
        &app,
        "POST",
        "/v1/auth/register",
        None,
        Some(json!({ "email": "a@x.com", "password": "other", "salt": "x" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "account already exists");
}

#[tokio::test]
async fn login_failures_are_indistinguishable() {
    let (app, _dir) = test_app().await;
    register(&app, "a@x.com", "hunter22").await;

    let (wrong_pw_status, wrong_pw) = send(
        &app,
        "POST",
        "/v1/auth/login",
        None,
        Some(json!({ "email": "a@x.com", "password": "nope" })),
    )
    .await;
    let (unknown_status, unknown) = send(
        &app,
        "POST",
        "/v1/auth/login",
        None,
        Some(json!({ "email": "b@x.com", "password": "hunter22" })),
    )
    .await;

    assert_eq!(wrong_pw_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_pw, unknown);
}

#[tokio::test]
async fn login_issues_a_working_token() {
    let (app, _dir) = test_app().await;
    register(&app, "a@x.com", "hunter22").await;

    let (status, body) = send(
        &app,
        "POST",
        "/v1/auth/login",
        None,
        Some(json!({ "email": "a@x.com", "password": "hunter22" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["token"].as_str().unwrap();

    let (status, body) = send(&app, "GET", "/v1/vault", Some(token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["vault"], Value::Null);
}

#[tokio::test]
async fn missing_register_fields_are_bad_requests() {
    let (app, _dir) = test_app().await;
    let (status, body) = send(
        &app,
        "POST",
        "/v1/auth/register",
        None,
        Some(json!({ "email": "a@x.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "missing field: password");
}

#[tokio::test]
async fn vault_routes_require_a_token() {
    let (app, _dir) = test_app().await;
    let (status, body) = send(&app, "GET", "/v1/vault", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "missing bearer token");

    let (status, _) = send(&app, "GET", "/v1/vault", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn personal_vault_save_get_reset_cycle() {
    let (app, _dir) = test_app().await;
    let token = register(&app, "a@x.com", "hunter22").await;

    let (status, _) = send(
        &app,
        "POST",
        "/v1/vault",
        Some(&token),
        Some(json!({ "ct": "Y2lwaGVy", "iv": "aXY" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, "GET", "/v1/vault", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["vault"]["ct"], "Y2lwaGVy");
    assert_eq!(body["vault"]["iv"], "aXY");

    // An empty field must not overwrite the stored blob.
    let (status, _) = send(
        &app,
        "POST",
        "/v1/vault",
        Some(&token),
        Some(json!({ "ct": "", "iv": "aXY" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (_, body) = send(&app, "GET", "/v1/vault", Some(&token), None).await;
    assert_eq!(body["vault"]["ct"], "Y2lwaGVy");

    let (status, _) = send(&app, "POST", "/v1/vault/reset", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = send(&app, "GET", "/v1/vault", Some(&token), None).await;
    assert_eq!(body["vault"], Value::Null);
}

#[tokio::test]
async fn typed_vault_create_list_and_member_gate() {
    let (app, _dir) = test_app().await;
    let owner = register(&app, "a@x.com", "hunter22").await;
    let outsider = register(&app, "b@x.com", "hunter22").await;

    let (status, body) = send(
        &app,
        "POST",
        "/v1/vaults",
        Some(&owner),
        Some(json!({ "name": "work", "kind": "shared" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let vault_id = body["vault"]["id"].as_str().unwrap().to_string();
    assert_eq!(body["vault"]["kind"], "shared");

    // Defaults: no name, no kind.
    let (status, body) = send(&app, "POST", "/v1/vaults", Some(&owner), Some(json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["vault"]["name"], "New Vault");
    assert_eq!(body["vault"]["kind"], "personal");

    let (status, _) = send(
        &app,
        "POST",
        "/v1/vaults",
        Some(&owner),
        Some(json!({ "kind": "pro-shared" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, "GET", "/v1/vaults", Some(&owner), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["vaults"].as_array().unwrap().len(), 2);

    let (status, body) = send(&app, "GET", "/v1/vaults", Some(&outsider), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["vaults"].as_array().unwrap().is_empty());

    let path = format!("/v1/vaults/{vault_id}");
    let (status, _) = send(&app, "GET", &path, Some(&outsider), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let save = format!("/v1/vaults/{vault_id}/save");
    let (status, _) = send(
        &app,
        "POST",
        &save,
        Some(&owner),
        Some(json!({ "ct": "Y3Q", "iv": "aXY" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = send(&app, "GET", &path, Some(&owner), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["vault"]["ct"], "Y3Q");
}

async fn create_shared(app: &Router, token: &str, secret: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/v1/shared",
        Some(token),
        Some(json!({ "name": "team", "join_password": secret })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "create shared failed: {body}");
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn creator_is_the_sole_owner_member() {
    let (app, _dir) = test_app().await;
    let owner = register(&app, "a@x.com", "hunter22").await;
    let id = create_shared(&app, &owner, "sesame").await;

    let (status, body) = send(&app, "GET", &format!("/v1/shared/{id}"), Some(&owner), None).await;
    assert_eq!(status, StatusCode::OK);
    let members = body["members"].as_array().unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0]["role"], "owner");
    assert_eq!(members[0]["email"], "a@x.com");
    assert!(body.get("join_password_hash").is_none());
}

#[tokio::test]
async fn metadata_is_member_gated() {
    let (app, _dir) = test_app().await;
    let owner = register(&app, "a@x.com", "hunter22").await;
    let outsider = register(&app, "b@x.com", "hunter22").await;
    let id = create_shared(&app, &owner, "sesame").await;

    let (status, _) = send(&app, "GET", &format!("/v1/shared/{id}"), Some(&outsider), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, "GET", "/v1/shared/nope", Some(&owner), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn wrong_join_secret_changes_nothing() {
    let (app, _dir) = test_app().await;
    let owner = register(&app, "a@x.com", "hunter22").await;
    let joiner = register(&app, "b@x.com", "hunter22").await;
    let id = create_shared(&app, &owner, "sesame").await;

    let (status, body) = send(
        &app,
        "POST",
        &format!("/v1/shared/{id}/join"),
        Some(&joiner),
        Some(json!({ "join_password": "wrong" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "incorrect join password");

    let (_, body) = send(&app, "GET", &format!("/v1/shared/{id}"), Some(&owner), None).await;
    assert_eq!(body["members"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn invite_then_join_binds_the_pending_member() {
    let (app, _dir) = test_app().await;
    let owner = register(&app, "a@x.com", "hunter22").await;
    let joiner = register(&app, "b@x.com", "hunter22").await;
    let id = create_shared(&app, &owner, "sesame").await;

    // Invites are owner-only.
    let (status, _) = send(
        &app,
        "POST",
        &format!("/v1/shared/{id}/invite"),
        Some(&joiner),
        Some(json!({ "email": "c@x.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        "POST",
        &format!("/v1/shared/{id}/invite"),
        Some(&owner),
        Some(json!({ "email": "b@x.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Re-inviting the same email is a no-op.
    let (status, _) = send(
        &app,
        "POST",
        &format!("/v1/shared/{id}/invite"),
        Some(&owner),
        Some(json!({ "email": "b@x.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // A pending invite grants no access.
    let (status, _) = send(&app, "GET", &format!("/v1/shared/{id}"), Some(&joiner), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        "POST",
        &format!("/v1/shared/{id}/join"),
        Some(&joiner),
        Some(json!({ "join_password": "sesame" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, "GET", &format!("/v1/shared/{id}"), Some(&joiner), None).await;
    let members = body["members"].as_array().unwrap();
    assert_eq!(members.len(), 2);
    assert_eq!(members[1]["email"], "b@x.com");
    assert_eq!(members[1]["status"], "online");
    assert!(members[1]["user_id"].is_string());
}

#[tokio::test]
async fn rejoin_is_idempotent_and_uninvited_join_appends() {
    let (app, _dir) = test_app().await;
    let owner = register(&app, "a@x.com", "hunter22").await;
    let joiner = register(&app, "b@x.com", "hunter22").await;
    let id = create_shared(&app, &owner, "sesame").await;

    let join = format!("/v1/shared/{id}/join");
    // No invite: joining with the secret appends a fresh member.
    let (status, _) = send(
        &app,
        "POST",
        &join,
        Some(&joiner),
        Some(json!({ "join_password": "sesame" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Joining again must not duplicate the membership.
    let (status, _) = send(
        &app,
        "POST",
        &join,
        Some(&joiner),
        Some(json!({ "join_password": "sesame" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, "GET", &format!("/v1/shared/{id}"), Some(&owner), None).await;
    assert_eq!(body["members"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn owner_leave_deletes_the_vault() {
    let (app, _dir) = test_app().await;
    let owner = register(&app, "a@x.com", "hunter22").await;
    let joiner = register(&app, "b@x.com", "hunter22").await;
    let id = create_shared(&app, &owner, "sesame").await;
    send(
        &app,
        "POST",
        &format!("/v1/shared/{id}/join"),
        Some(&joiner),
        Some(json!({ "join_password": "sesame" })),
    )
    .await;

    let (status, body) = send(
        &app,
        "POST",
        &format!("/v1/shared/{id}/leave"),
        Some(&owner),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deleted"], true);

    let (status, _) = send(&app, "GET", &format!("/v1/shared/{id}"), Some(&joiner), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn member_leave_keeps_the_vault() {
    let (app, _dir) = test_app().await;
    let owner = register(&app, "a@x.com", "hunter22").await;
    let joiner = register(&app, "b@x.com", "hunter22").await;
    let id = create_shared(&app, &owner, "sesame").await;
    send(
        &app,
        "POST",
        &format!("/v1/shared/{id}/join"),
        Some(&joiner),
        Some(json!({ "join_password": "sesame" })),
    )
    .await;

    let (status, body) = send(
        &app,
        "POST",
        &format!("/v1/shared/{id}/leave"),
        Some(&joiner),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deleted"], false);

    let (_, body) = send(&app, "GET", &format!("/v1/shared/{id}"), Some(&owner), None).await;
    assert_eq!(body["members"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn kick_is_owner_only_and_unconditional() {
    let (app, _dir) = test_app().await;
    let owner = register(&app, "a@x.com", "hunter22").await;
    let joiner = register(&app, "b@x.com", "hunter22").await;
    let id = create_shared(&app, &owner, "sesame").await;
    send(
        &app,
        "POST",
        &format!("/v1/shared/{id}/join"),
        Some(&joiner),
        Some(json!({ "join_password": "sesame" })),
    )
    .await;

    // Members cannot kick, not even themselves via this endpoint.
    let (status, _) = send(
        &app,
        "POST",
        &format!("/v1/shared/{id}/kick"),
        Some(&joiner),
        Some(json!({ "user_id": "whoever" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, body) = send(&app, "GET", &format!("/v1/shared/{id}"), Some(&owner), None).await;
    let kicked_id = body["members"][1]["user_id"].as_str().unwrap().to_string();

    let (status, _) = send(
        &app,
        "POST",
        &format!("/v1/shared/{id}/kick"),
        Some(&owner),
        Some(json!({ "user_id": kicked_id })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        "GET",
        &format!("/v1/shared/{id}/data"),
        Some(&joiner),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn status_accepts_only_known_presence_values() {
    let (app, _dir) = test_app().await;
    let owner = register(&app, "a@x.com", "hunter22").await;
    let outsider = register(&app, "b@x.com", "hunter22").await;
    let id = create_shared(&app, &owner, "sesame").await;
    let status_path = format!("/v1/shared/{id}/status");

    let (status, _) = send(
        &app,
        "POST",
        &status_path,
        Some(&owner),
        Some(json!({ "status": "busy" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "POST",
        &status_path,
        Some(&outsider),
        Some(json!({ "status": "idle" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        "POST",
        &status_path,
        Some(&owner),
        Some(json!({ "status": "idle" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, "GET", &format!("/v1/shared/{id}"), Some(&owner), None).await;
    assert_eq!(body["members"][0]["status"], "idle");
}

#[tokio::test]
async fn shared_blob_save_and_read_are_member_gated() {
    let (app, _dir) = test_app().await;
    let owner = register(&app, "a@x.com", "hunter22").await;
    let outsider = register(&app, "b@x.com", "hunter22").await;
    let id = create_shared(&app, &owner, "sesame").await;
    let data = format!("/v1/shared/{id}/data");
    let save = format!("/v1/shared/{id}/save");

    let (status, _) = send(&app, "GET", &data, Some(&outsider), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        "POST",
        &save,
        Some(&outsider),
        Some(json!({ "ct": "Y3Q", "iv": "aXY" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        "POST",
        &save,
        Some(&owner),
        Some(json!({ "ct": "Y3Q", "iv": "aXY" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, "GET", &data, Some(&owner), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["vault"]["ct"], "Y3Q");
    assert_eq!(body["vault"]["iv"], "aXY");
}
