// SPDX-FileCopyrightText: 2026 Keyfold Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Keyfold configuration system.

use keyfold_config::diagnostic::{ConfigError, suggest_key};
use keyfold_config::{load_and_validate_str, load_config_from_str};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_keyfold_config() {
    let toml = r#"
[server]
host = "0.0.0.0"
port = 9000
log_level = "debug"

[storage]
database_path = "/tmp/test.db"
wal_mode = false

[auth]
token_secret = "0123456789abcdef0123456789abcdef"
token_ttl_days = 14
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.port, 9000);
    assert_eq!(config.server.log_level, "debug");
    assert_eq!(config.storage.database_path, "/tmp/test.db");
    assert!(!config.storage.wal_mode);
    assert_eq!(
        config.auth.token_secret.as_deref(),
        Some("0123456789abcdef0123456789abcdef")
    );
    assert_eq!(config.auth.token_ttl_days, 14);
}

/// Unknown field in [server] section produces an UnknownField error.
#[test]
fn unknown_field_in_server_produces_error() {
    let toml = r#"
[server]
prot = 9000
"#;

    let err = load_config_from_str(toml).expect_err("should reject unknown field");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("prot"),
        "error should mention unknown field or the bad key, got: {err_str}"
    );
}

/// Missing optional sections use defaults without error.
#[test]
fn missing_sections_use_defaults() {
    let config = load_config_from_str("").expect("empty TOML should use defaults");
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 8420);
    assert_eq!(config.storage.database_path, "keyfold.db");
    assert!(config.storage.wal_mode);
    assert!(config.auth.token_secret.is_none());
    assert_eq!(config.auth.token_ttl_days, 7);
}

/// load_and_validate_str surfaces both parse and validation failures.
#[test]
fn validation_failures_surface_as_config_errors() {
    let toml = r#"
[auth]
token_secret = "too-short"
"#;

    let errors = load_and_validate_str(toml).expect_err("short secret should fail validation");
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("token_secret")))
    );
}

/// The typo suggestion machinery recognizes close key names.
#[test]
fn unknown_key_gets_a_suggestion() {
    let toml = r#"
[storage]
databse_path = "/tmp/x.db"
"#;

    let errors = load_and_validate_str(toml).expect_err("typo should be rejected");
    let has_suggestion = errors.iter().any(|e| {
        matches!(
            e,
            ConfigError::UnknownKey {
                suggestion: Some(s),
                ..
            } if s == "database_path"
        )
    });
    assert!(has_suggestion, "expected a database_path suggestion: {errors:?}");
}

/// Direct check on the Jaro-Winkler suggestion helper.
#[test]
fn suggestion_helper_matches_near_keys_only() {
    let valid = &["database_path", "wal_mode"];
    assert_eq!(
        suggest_key("databse_path", valid),
        Some("database_path".to_string())
    );
    assert_eq!(suggest_key("completely_different", valid), None);
}

/// Invalid types are reported with the offending key path.
#[test]
fn invalid_type_is_reported() {
    let toml = r#"
[server]
port = "not-a-number"
"#;

    let err = load_config_from_str(toml).expect_err("string port should fail");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("invalid type") || err_str.contains("port"),
        "got: {err_str}"
    );
}
