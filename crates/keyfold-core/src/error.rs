// SPDX-FileCopyrightText: 2026 Keyfold Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Keyfold vault server.

use thiserror::Error;

/// The primary error type used across all Keyfold crates.
///
/// The first five variants form the request-level taxonomy: every handler
/// failure maps to exactly one of them, and the gateway converts each to a
/// stable HTTP status code. `Config`, `Storage`, and `Internal` cover
/// operational failures that surface as opaque 500s.
#[derive(Debug, Error)]
pub enum KeyfoldError {
    /// Missing or invalid input (empty blob fields, unknown status value).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Missing, invalid, or expired token; bad login credentials.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated but not permitted (wrong join secret, non-owner
    /// attempting an owner-only action, non-member reading a blob).
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// A vault or user id does not resolve.
    #[error("not found: {0}")]
    NotFound(String),

    /// Duplicate registration or a membership uniqueness violation.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Configuration errors (invalid TOML, missing required fields).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
