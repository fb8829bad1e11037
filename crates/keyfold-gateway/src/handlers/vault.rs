// SPDX-FileCopyrightText: 2026 Keyfold Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Personal vault handlers. One opaque blob per user, stored on the user
//! row; saves are whole-blob overwrites and reset is irreversible.

use axum::{Extension, Json, extract::State};
use keyfold_core::{Identity, KeyfoldError};
use keyfold_storage::queries::users;

use crate::error::ApiResult;
use crate::handlers::{BlobRequest, BlobResponse, OkResponse};
use crate::server::GatewayState;

/// GET /v1/vault
pub async fn get_personal(
    State(state): State<GatewayState>,
    Extension(identity): Extension<Identity>,
) -> ApiResult<Json<BlobResponse>> {
    let user = users::get_user_by_id(&state.db, &identity.user_id)
        .await?
        .ok_or_else(|| KeyfoldError::NotFound("account not found".to_string()))?;
    Ok(Json(BlobResponse { vault: user.vault }))
}

/// POST /v1/vault
pub async fn save_personal(
    State(state): State<GatewayState>,
    Extension(identity): Extension<Identity>,
    Json(body): Json<BlobRequest>,
) -> ApiResult<Json<OkResponse>> {
    let blob = body.into_blob()?;
    let saved = users::save_personal_vault(&state.db, &identity.user_id, &blob).await?;
    if !saved {
        return Err(KeyfoldError::NotFound("account not found".to_string()).into());
    }
    Ok(OkResponse::ok())
}

/// POST /v1/vault/reset
pub async fn reset_personal(
    State(state): State<GatewayState>,
    Extension(identity): Extension<Identity>,
) -> ApiResult<Json<OkResponse>> {
    let reset = users::reset_personal_vault(&state.db, &identity.user_id).await?;
    if !reset {
        return Err(KeyfoldError::NotFound("account not found".to_string()).into());
    }
    tracing::info!(user_id = %identity.user_id, "personal vault reset");
    Ok(OkResponse::ok())
}
