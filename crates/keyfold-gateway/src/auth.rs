// SPDX-FileCopyrightText: 2026 Keyfold Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bearer-token authentication middleware.
//!
//! Verifies the `Authorization: Bearer <token>` header and injects the
//! resulting [`Identity`] as a request extension for handlers to extract.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use keyfold_auth::TokenSigner;
use keyfold_core::KeyfoldError;

use crate::error::ApiError;

/// State for the auth middleware.
#[derive(Clone)]
pub struct AuthState {
    pub signer: Arc<TokenSigner>,
}

/// Middleware that requires a valid bearer token on every request it wraps.
pub async fn auth_middleware(
    State(auth): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = request
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(|| KeyfoldError::Unauthorized("missing bearer token".to_string()))?;

    let identity = auth.signer.verify(token)?;
    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}
