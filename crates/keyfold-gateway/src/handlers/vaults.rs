// SPDX-FileCopyrightText: 2026 Keyfold Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed vault record handlers: list, create, and member-gated blob access.

use std::str::FromStr;

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use keyfold_core::{Identity, KeyfoldError, Role, VaultKind, access};
use keyfold_storage::{
    VaultMember, VaultRecord, VaultSummary,
    queries::vaults,
};
use serde::{Deserialize, Serialize};

use crate::error::ApiResult;
use crate::handlers::{BlobRequest, BlobResponse, OkResponse, now_iso};
use crate::server::GatewayState;

/// Request body for POST /v1/vaults.
#[derive(Debug, Deserialize)]
pub struct CreateVaultRequest {
    #[serde(default)]
    pub name: Option<String>,
    /// Defaults to `personal` when absent.
    #[serde(default)]
    pub kind: Option<String>,
}

/// Response body for GET /v1/vaults.
#[derive(Debug, Serialize)]
pub struct VaultListResponse {
    pub vaults: Vec<VaultSummary>,
}

/// Response body for POST /v1/vaults.
#[derive(Debug, Serialize)]
pub struct CreateVaultResponse {
    pub vault: VaultSummary,
}

/// GET /v1/vaults
pub async fn list_vaults(
    State(state): State<GatewayState>,
    Extension(identity): Extension<Identity>,
) -> ApiResult<Json<VaultListResponse>> {
    let summaries = vaults::list_vaults_for_user(&state.db, &identity.user_id).await?;
    Ok(Json(VaultListResponse { vaults: summaries }))
}

/// POST /v1/vaults
pub async fn create_vault(
    State(state): State<GatewayState>,
    Extension(identity): Extension<Identity>,
    Json(body): Json<CreateVaultRequest>,
) -> ApiResult<Json<CreateVaultResponse>> {
    let name = body
        .name
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| "New Vault".to_string());
    let kind = match body.kind.as_deref() {
        None | Some("") => VaultKind::Personal,
        Some(raw) => VaultKind::from_str(raw)
            .map_err(|_| KeyfoldError::BadRequest(format!("invalid vault kind: {raw}")))?,
    };

    let now = now_iso();
    let vault = VaultRecord {
        id: uuid::Uuid::new_v4().to_string(),
        owner_id: identity.user_id.clone(),
        name,
        kind,
        members: vec![VaultMember {
            user_id: Some(identity.user_id.clone()),
            email: identity.email.clone(),
            role: Role::Owner,
            last_seen_at: Some(now.clone()),
        }],
        blob: None,
        created_at: now.clone(),
        updated_at: now,
    };
    vaults::create_vault(&state.db, &vault).await?;
    tracing::info!(vault_id = %vault.id, owner_id = %vault.owner_id, "vault created");

    Ok(Json(CreateVaultResponse {
        vault: VaultSummary {
            id: vault.id,
            name: vault.name,
            kind: vault.kind,
            owner_id: vault.owner_id,
        },
    }))
}

/// GET /v1/vaults/{id}
pub async fn get_vault_blob(
    State(state): State<GatewayState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> ApiResult<Json<BlobResponse>> {
    let vault = load_for_member(&state, &id, &identity).await?;
    Ok(Json(BlobResponse { vault: vault.blob }))
}

/// POST /v1/vaults/{id}/save
pub async fn save_vault_blob(
    State(state): State<GatewayState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
    Json(body): Json<BlobRequest>,
) -> ApiResult<Json<OkResponse>> {
    let blob = body.into_blob()?;
    load_for_member(&state, &id, &identity).await?;
    vaults::save_vault_blob(&state.db, &id, &blob).await?;
    Ok(OkResponse::ok())
}

/// Load a vault and require the caller to be its owner or a bound member.
async fn load_for_member(
    state: &GatewayState,
    id: &str,
    identity: &Identity,
) -> Result<VaultRecord, crate::error::ApiError> {
    let vault = vaults::get_vault(&state.db, id)
        .await?
        .ok_or_else(|| KeyfoldError::NotFound("vault not found".to_string()))?;

    let member_ids = vault.members.iter().map(|m| m.user_id.as_deref());
    if !access::evaluate(&vault.owner_id, member_ids, &identity.user_id).is_member_or_owner() {
        return Err(KeyfoldError::Forbidden("not a member".to_string()).into());
    }
    Ok(vault)
}
