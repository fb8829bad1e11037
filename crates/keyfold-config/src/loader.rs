// SPDX-FileCopyrightText: 2026 Keyfold Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./keyfold.toml` > `~/.config/keyfold/keyfold.toml`
//! > `/etc/keyfold/keyfold.toml` with environment variable overrides via the
//! `KEYFOLD_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::KeyfoldConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/keyfold/keyfold.toml` (system-wide)
/// 3. `~/.config/keyfold/keyfold.toml` (user XDG config)
/// 4. `./keyfold.toml` (local directory)
/// 5. `KEYFOLD_*` environment variables
pub fn load_config() -> Result<KeyfoldConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(KeyfoldConfig::default()))
        .merge(Toml::file("/etc/keyfold/keyfold.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("keyfold/keyfold.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("keyfold.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env vars).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<KeyfoldConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(KeyfoldConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<KeyfoldConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(KeyfoldConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` so that keys containing
/// underscores stay intact: `KEYFOLD_AUTH_TOKEN_SECRET` must map to
/// `auth.token_secret`, not `auth.token.secret`.
fn env_provider() -> Env {
    Env::prefixed("KEYFOLD_").map(|key| {
        let mapped = key
            .as_str()
            .replacen("server_", "server.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("auth_", "auth.", 1);
        mapped.into()
    })
}
