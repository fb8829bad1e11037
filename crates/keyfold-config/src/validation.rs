// SPDX-FileCopyrightText: 2026 Keyfold Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as valid bind addresses and a usable signing secret.

use crate::diagnostic::ConfigError;
use crate::model::KeyfoldConfig;

/// Minimum length for the token signing secret, matching the HMAC-SHA256
/// block recommendation.
const MIN_TOKEN_SECRET_BYTES: usize = 32;

const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &KeyfoldConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let host = config.server.host.trim();
    if host.is_empty() {
        errors.push(ConfigError::Validation {
            message: "server.host must not be empty".to_string(),
        });
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            errors.push(ConfigError::Validation {
                message: format!("server.host `{host}` is not a valid IP address or hostname"),
            });
        }
    }

    if !VALID_LOG_LEVELS.contains(&config.server.log_level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "server.log_level `{}` is not one of: {}",
                config.server.log_level,
                VALID_LOG_LEVELS.join(", ")
            ),
        });
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    if let Some(secret) = &config.auth.token_secret
        && secret.len() < MIN_TOKEN_SECRET_BYTES
    {
        errors.push(ConfigError::Validation {
            message: format!(
                "auth.token_secret must be at least {MIN_TOKEN_SECRET_BYTES} bytes, got {}",
                secret.len()
            ),
        });
    }

    if config.auth.token_ttl_days < 1 {
        errors.push(ConfigError::Validation {
            message: format!(
                "auth.token_ttl_days must be at least 1, got {}",
                config.auth.token_ttl_days
            ),
        });
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&KeyfoldConfig::default()).is_ok());
    }

    #[test]
    fn empty_host_is_rejected() {
        let mut config = KeyfoldConfig::default();
        config.server.host = "  ".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(|e| e.to_string().contains("server.host")));
    }

    #[test]
    fn short_token_secret_is_rejected() {
        let mut config = KeyfoldConfig::default();
        config.auth.token_secret = Some("short".to_string());
        let errors = validate_config(&config).unwrap_err();
        assert!(
            errors
                .iter()
                .any(|e| e.to_string().contains("token_secret"))
        );
    }

    #[test]
    fn long_token_secret_is_accepted() {
        let mut config = KeyfoldConfig::default();
        config.auth.token_secret = Some("x".repeat(48));
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn bad_log_level_is_rejected() {
        let mut config = KeyfoldConfig::default();
        config.server.log_level = "verbose".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(|e| e.to_string().contains("log_level")));
    }

    #[test]
    fn zero_ttl_is_rejected() {
        let mut config = KeyfoldConfig::default();
        config.auth.token_ttl_days = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(
            errors
                .iter()
                .any(|e| e.to_string().contains("token_ttl_days"))
        );
    }

    #[test]
    fn multiple_errors_are_collected() {
        let mut config = KeyfoldConfig::default();
        config.server.host = String::new();
        config.storage.database_path = String::new();
        config.auth.token_ttl_days = 0;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
