// SPDX-FileCopyrightText: 2026 Keyfold Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state. [`router`] is separated
//! from [`start_server`] so tests can drive the router directly without
//! binding a socket.

use std::sync::Arc;

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{get, post},
};
use keyfold_auth::TokenSigner;
use keyfold_core::KeyfoldError;
use keyfold_storage::Database;
use tower_http::cors::CorsLayer;

use crate::auth::{AuthState, auth_middleware};
use crate::handlers;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// SQLite handle; all writes serialize through its single writer thread.
    pub db: Database,
    /// Token issue/verify. Shared with the auth middleware.
    pub signer: Arc<TokenSigner>,
}

/// Gateway server configuration (mirrors ServerConfig from keyfold-config).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
}

/// Build the full application router.
pub fn router(state: GatewayState) -> Router {
    let auth_state = AuthState {
        signer: state.signer.clone(),
    };

    // Unauthenticated routes: liveness plus the credential endpoints that
    // mint tokens in the first place.
    let public_routes = Router::new()
        .route("/health", get(handlers::get_health))
        .route("/v1/auth/register", post(handlers::auth::post_register))
        .route("/v1/auth/login", post(handlers::auth::post_login))
        .with_state(state.clone());

    // Everything else requires a valid bearer token.
    let api_routes = Router::new()
        .route(
            "/v1/vault",
            get(handlers::vault::get_personal).post(handlers::vault::save_personal),
        )
        .route("/v1/vault/reset", post(handlers::vault::reset_personal))
        .route(
            "/v1/vaults",
            get(handlers::vaults::list_vaults).post(handlers::vaults::create_vault),
        )
        .route("/v1/vaults/{id}", get(handlers::vaults::get_vault_blob))
        .route("/v1/vaults/{id}/save", post(handlers::vaults::save_vault_blob))
        .route("/v1/shared", post(handlers::shared::create_shared))
        .route("/v1/shared/{id}", get(handlers::shared::get_metadata))
        .route("/v1/shared/{id}/invite", post(handlers::shared::invite_member))
        .route("/v1/shared/{id}/join", post(handlers::shared::join_shared))
        .route("/v1/shared/{id}/leave", post(handlers::shared::leave_shared))
        .route("/v1/shared/{id}/kick", post(handlers::shared::kick_member))
        .route("/v1/shared/{id}/status", post(handlers::shared::update_status))
        .route("/v1/shared/{id}/data", get(handlers::shared::get_shared_blob))
        .route("/v1/shared/{id}/save", post(handlers::shared::save_shared_blob))
        .route_layer(axum_middleware::from_fn_with_state(
            auth_state,
            auth_middleware,
        ))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        .layer(CorsLayer::permissive())
}

/// Bind the configured address and serve the API until the task is aborted.
pub async fn start_server(config: &ServerConfig, state: GatewayState) -> Result<(), KeyfoldError> {
    let app = router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| KeyfoldError::Internal(format!("failed to bind gateway to {addr}: {e}")))?;

    tracing::info!("gateway listening on {addr}");

    axum::serve(listener, app)
        .await
        .map_err(|e| KeyfoldError::Internal(format!("gateway server error: {e}")))?;

    Ok(())
}
