// SPDX-FileCopyrightText: 2026 Keyfold Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared vault handlers: creation, membership lifecycle, presence, and
//! member-gated blob access.
//!
//! The join secret is verified against its argon2 hash before the join plan
//! is applied, so a wrong secret never mutates the member list.

use std::str::FromStr;

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use keyfold_auth::{hash_secret, verify_secret};
use keyfold_core::{
    Identity, JoinPlan, KeyfoldError, Member, Presence, Role,
    access::{self, plan_join},
};
use keyfold_storage::{SharedVault, queries::shared_vaults};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};
use crate::handlers::{BlobRequest, BlobResponse, OkResponse, now_iso, require};
use crate::server::GatewayState;

/// Request body for POST /v1/shared.
#[derive(Debug, Deserialize)]
pub struct CreateSharedRequest {
    #[serde(default)]
    pub name: Option<String>,
    /// Join secret; stored only as an argon2 hash.
    #[serde(default)]
    pub join_password: Option<String>,
}

/// Response body for POST /v1/shared.
#[derive(Debug, Serialize)]
pub struct CreateSharedResponse {
    pub id: String,
    pub name: String,
}

/// Request body for POST /v1/shared/{id}/invite.
#[derive(Debug, Deserialize)]
pub struct InviteRequest {
    #[serde(default)]
    pub email: Option<String>,
}

/// Request body for POST /v1/shared/{id}/join.
#[derive(Debug, Deserialize)]
pub struct JoinRequest {
    #[serde(default)]
    pub join_password: Option<String>,
}

/// Request body for POST /v1/shared/{id}/kick.
#[derive(Debug, Deserialize)]
pub struct KickRequest {
    #[serde(default)]
    pub user_id: Option<String>,
}

/// Request body for POST /v1/shared/{id}/status.
#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    #[serde(default)]
    pub status: Option<String>,
}

/// Response body for POST /v1/shared/{id}/leave.
#[derive(Debug, Serialize)]
pub struct LeaveResponse {
    pub ok: bool,
    /// True when the owner left and the whole vault was deleted.
    pub deleted: bool,
}

/// One member as rendered in the metadata response.
#[derive(Debug, Serialize)]
pub struct MemberView {
    pub user_id: Option<String>,
    pub email: String,
    pub role: Role,
    pub status: Presence,
}

impl From<&Member> for MemberView {
    fn from(member: &Member) -> Self {
        MemberView {
            user_id: member.user_id().map(str::to_string),
            email: member.email().to_string(),
            role: member.role(),
            status: member.status(),
        }
    }
}

/// Response body for GET /v1/shared/{id}.
#[derive(Debug, Serialize)]
pub struct MetadataResponse {
    pub name: String,
    pub owner_id: String,
    pub members: Vec<MemberView>,
}

/// POST /v1/shared
pub async fn create_shared(
    State(state): State<GatewayState>,
    Extension(identity): Extension<Identity>,
    Json(body): Json<CreateSharedRequest>,
) -> ApiResult<Json<CreateSharedResponse>> {
    let name = require(body.name, "name")?;
    let join_password = require(body.join_password, "join_password")?;

    let now = now_iso();
    let vault = SharedVault {
        id: uuid::Uuid::new_v4().to_string(),
        owner_id: identity.user_id.clone(),
        name: name.clone(),
        join_password_hash: hash_secret(&join_password)?,
        members: vec![Member::bound(
            identity.user_id.clone(),
            identity.email.clone(),
            Role::Owner,
            Presence::Online,
        )],
        blob: None,
        created_at: now.clone(),
        updated_at: now,
    };
    shared_vaults::create_shared_vault(&state.db, &vault).await?;
    tracing::info!(vault_id = %vault.id, owner_id = %vault.owner_id, "shared vault created");

    Ok(Json(CreateSharedResponse { id: vault.id, name }))
}

/// GET /v1/shared/{id}
pub async fn get_metadata(
    State(state): State<GatewayState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> ApiResult<Json<MetadataResponse>> {
    let vault = load_for_member(&state, &id, &identity).await?;
    Ok(Json(MetadataResponse {
        name: vault.name,
        owner_id: vault.owner_id,
        members: vault.members.iter().map(MemberView::from).collect(),
    }))
}

/// POST /v1/shared/{id}/invite
pub async fn invite_member(
    State(state): State<GatewayState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
    Json(body): Json<InviteRequest>,
) -> ApiResult<Json<OkResponse>> {
    let email = require(body.email, "email")?;
    let vault = load_vault(&state, &id).await?;
    require_owner(&vault, &identity)?;

    // Re-inviting an existing member or pending invite is a no-op.
    if vault.members.iter().any(|m| m.email() == email) {
        return Ok(OkResponse::ok());
    }

    shared_vaults::add_pending_member(&state.db, &id, &email).await?;
    Ok(OkResponse::ok())
}

/// POST /v1/shared/{id}/join
pub async fn join_shared(
    State(state): State<GatewayState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
    Json(body): Json<JoinRequest>,
) -> ApiResult<Json<OkResponse>> {
    let join_password = require(body.join_password, "join_password")?;
    let vault = load_vault(&state, &id).await?;

    if !verify_secret(&join_password, &vault.join_password_hash)? {
        return Err(KeyfoldError::Forbidden("incorrect join password".to_string()).into());
    }

    match plan_join(&vault.members, &identity) {
        JoinPlan::BindPending => {
            shared_vaults::bind_member(&state.db, &id, &identity.email, &identity.user_id).await?;
        }
        JoinPlan::Rejoin => {
            shared_vaults::set_member_status(&state.db, &id, &identity.user_id, Presence::Online)
                .await?;
        }
        JoinPlan::Append => {
            shared_vaults::add_bound_member(&state.db, &id, &identity.user_id, &identity.email)
                .await?;
        }
        JoinPlan::EmailTaken => {
            return Err(KeyfoldError::Conflict(
                "email already bound to another account".to_string(),
            )
            .into());
        }
    }
    tracing::info!(vault_id = %id, user_id = %identity.user_id, "member joined shared vault");
    Ok(OkResponse::ok())
}

/// POST /v1/shared/{id}/leave
pub async fn leave_shared(
    State(state): State<GatewayState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> ApiResult<Json<LeaveResponse>> {
    let vault = load_vault(&state, &id).await?;

    let caller = access::evaluate_shared(&vault.owner_id, &vault.members, &identity.user_id);
    if !caller.is_member_or_owner() {
        return Err(KeyfoldError::Forbidden("not a member".to_string()).into());
    }

    // The owner leaving dissolves the vault for everyone.
    if caller.is_owner() {
        shared_vaults::delete_shared_vault(&state.db, &id).await?;
        tracing::info!(vault_id = %id, "shared vault deleted by owner leave");
        return Ok(Json(LeaveResponse {
            ok: true,
            deleted: true,
        }));
    }

    shared_vaults::remove_member(&state.db, &id, &identity.user_id).await?;
    Ok(Json(LeaveResponse {
        ok: true,
        deleted: false,
    }))
}

/// POST /v1/shared/{id}/kick
pub async fn kick_member(
    State(state): State<GatewayState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
    Json(body): Json<KickRequest>,
) -> ApiResult<Json<OkResponse>> {
    let target = require(body.user_id, "user_id")?;
    let vault = load_vault(&state, &id).await?;
    require_owner(&vault, &identity)?;

    let removed = shared_vaults::remove_member(&state.db, &id, &target).await?;
    if !removed {
        return Err(KeyfoldError::NotFound("member not found".to_string()).into());
    }
    tracing::info!(vault_id = %id, kicked = %target, "member kicked from shared vault");
    Ok(OkResponse::ok())
}

/// POST /v1/shared/{id}/status
pub async fn update_status(
    State(state): State<GatewayState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
    Json(body): Json<StatusRequest>,
) -> ApiResult<Json<OkResponse>> {
    let raw = require(body.status, "status")?;
    let status = Presence::from_str(&raw)
        .map_err(|_| KeyfoldError::BadRequest(format!("invalid status: {raw}")))?;

    load_vault(&state, &id).await?;
    let updated = shared_vaults::set_member_status(&state.db, &id, &identity.user_id, status).await?;
    if !updated {
        return Err(KeyfoldError::Forbidden("not a member".to_string()).into());
    }
    Ok(OkResponse::ok())
}

/// GET /v1/shared/{id}/data
pub async fn get_shared_blob(
    State(state): State<GatewayState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> ApiResult<Json<BlobResponse>> {
    let vault = load_for_member(&state, &id, &identity).await?;
    Ok(Json(BlobResponse { vault: vault.blob }))
}

/// POST /v1/shared/{id}/save
pub async fn save_shared_blob(
    State(state): State<GatewayState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
    Json(body): Json<BlobRequest>,
) -> ApiResult<Json<OkResponse>> {
    let blob = body.into_blob()?;
    load_for_member(&state, &id, &identity).await?;
    shared_vaults::save_shared_blob(&state.db, &id, &blob).await?;
    Ok(OkResponse::ok())
}

async fn load_vault(state: &GatewayState, id: &str) -> Result<SharedVault, ApiError> {
    shared_vaults::get_shared_vault(&state.db, id)
        .await?
        .ok_or_else(|| KeyfoldError::NotFound("vault not found".to_string()).into())
}

/// Load a shared vault and require the caller to be its owner or a bound
/// member.
async fn load_for_member(
    state: &GatewayState,
    id: &str,
    identity: &Identity,
) -> Result<SharedVault, ApiError> {
    let vault = load_vault(state, id).await?;
    if !access::evaluate_shared(&vault.owner_id, &vault.members, &identity.user_id)
        .is_member_or_owner()
    {
        return Err(KeyfoldError::Forbidden("not a member".to_string()).into());
    }
    Ok(vault)
}

fn require_owner(vault: &SharedVault, identity: &Identity) -> Result<(), ApiError> {
    if vault.owner_id != identity.user_id {
        return Err(KeyfoldError::Forbidden("owner only".to_string()).into());
    }
    Ok(())
}
