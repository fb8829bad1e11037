// SPDX-FileCopyrightText: 2026 Keyfold Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `keyfold serve` command implementation.
//!
//! Opens the database, builds the token signer from config, and runs the
//! gateway until the process is stopped.

use std::sync::Arc;

use keyfold_auth::TokenSigner;
use keyfold_config::model::KeyfoldConfig;
use keyfold_core::KeyfoldError;
use keyfold_gateway::{GatewayState, ServerConfig, start_server};
use keyfold_storage::Database;
use tracing::info;

/// Runs the `keyfold serve` command.
pub async fn run_serve(config: KeyfoldConfig) -> Result<(), KeyfoldError> {
    init_tracing(&config.server.log_level);

    info!("starting keyfold serve");

    let token_secret = config.auth.token_secret.clone().ok_or_else(|| {
        KeyfoldError::Config(
            "auth.token_secret is required to serve \
             (set KEYFOLD_AUTH_TOKEN_SECRET or [auth] token_secret)"
                .to_string(),
        )
    })?;

    let db = Database::open(&config.storage.database_path, config.storage.wal_mode).await?;
    let signer = Arc::new(TokenSigner::new(
        token_secret.into_bytes(),
        config.auth.token_ttl_days,
    ));

    let state = GatewayState {
        db: db.clone(),
        signer,
    };
    let server_config = ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
    };

    let result = start_server(&server_config, state).await;
    db.close().await?;
    result
}

fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("keyfold={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
