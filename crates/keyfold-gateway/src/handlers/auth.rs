// SPDX-FileCopyrightText: 2026 Keyfold Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Registration and login handlers.
//!
//! Login failures are deliberately indistinguishable: unknown email and bad
//! password both return the same 401 body.

use axum::{Json, extract::State};
use keyfold_auth::{hash_secret, verify_secret};
use keyfold_core::KeyfoldError;
use keyfold_storage::{User, queries::users};
use serde::{Deserialize, Serialize};

use crate::error::ApiResult;
use crate::handlers::{now_iso, require};
use crate::server::GatewayState;

/// Request body for POST /v1/auth/register.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    /// Client-side key-derivation salt, stored verbatim.
    #[serde(default)]
    pub salt: Option<String>,
}

/// Request body for POST /v1/auth/login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Response body for both credential endpoints.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    /// Signed bearer token, 7-day expiry by default.
    pub token: String,
    pub user: UserView,
}

/// The public slice of a user record.
#[derive(Debug, Serialize)]
pub struct UserView {
    pub email: String,
    pub salt: String,
}

/// POST /v1/auth/register
pub async fn post_register(
    State(state): State<GatewayState>,
    Json(body): Json<RegisterRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let email = require(body.email, "email")?;
    let password = require(body.password, "password")?;
    let salt = require(body.salt, "salt")?;

    // Early duplicate check for a friendly error; the UNIQUE constraint in
    // create_user closes the race.
    if users::get_user_by_email(&state.db, &email).await?.is_some() {
        return Err(KeyfoldError::Conflict("account already exists".to_string()).into());
    }

    let now = now_iso();
    let user = User {
        id: uuid::Uuid::new_v4().to_string(),
        email: email.clone(),
        password_hash: hash_secret(&password)?,
        salt: salt.clone(),
        vault: None,
        created_at: now.clone(),
        updated_at: now,
    };
    users::create_user(&state.db, &user).await?;

    let token = state.signer.issue(&user.id, &user.email)?;
    tracing::info!(user_id = %user.id, "user registered");

    Ok(Json(AuthResponse {
        token,
        user: UserView { email, salt },
    }))
}

/// POST /v1/auth/login
pub async fn post_login(
    State(state): State<GatewayState>,
    Json(body): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let email = require(body.email, "email")?;
    let password = require(body.password, "password")?;

    let invalid = || KeyfoldError::Unauthorized("invalid credentials".to_string());

    let user = users::get_user_by_email(&state.db, &email)
        .await?
        .ok_or_else(invalid)?;
    if !verify_secret(&password, &user.password_hash)? {
        return Err(invalid().into());
    }

    let token = state.signer.issue(&user.id, &user.email)?;

    Ok(Json(AuthResponse {
        token,
        user: UserView {
            email: user.email,
            salt: user.salt,
        },
    }))
}
