// SPDX-FileCopyrightText: 2026 Keyfold Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the vault REST API.
//!
//! Request DTOs use `Option` fields so missing input maps to a 400 with the
//! standard error body rather than an extractor rejection.

pub mod auth;
pub mod shared;
pub mod vault;
pub mod vaults;

use axum::Json;
use keyfold_core::{KeyfoldError, VaultBlob};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error description.
    pub error: String,
}

/// Generic acknowledgement body for mutations.
#[derive(Debug, Serialize)]
pub struct OkResponse {
    pub ok: bool,
}

impl OkResponse {
    pub fn ok() -> Json<Self> {
        Json(OkResponse { ok: true })
    }
}

/// Request body carrying an encrypted blob.
#[derive(Debug, Deserialize)]
pub struct BlobRequest {
    #[serde(default)]
    pub ct: Option<String>,
    #[serde(default)]
    pub iv: Option<String>,
}

impl BlobRequest {
    /// Both fields must be present and non-empty; rejects before any write.
    pub fn into_blob(self) -> Result<VaultBlob, ApiError> {
        let ct = require(self.ct, "ct")?;
        let iv = require(self.iv, "iv")?;
        Ok(VaultBlob { ct, iv })
    }
}

/// Response body wrapping an optional blob.
#[derive(Debug, Serialize)]
pub struct BlobResponse {
    pub vault: Option<VaultBlob>,
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Health status string.
    pub status: String,
    /// Binary version.
    pub version: String,
}

/// GET /health
pub async fn get_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Extract a required, non-empty string field.
pub(crate) fn require(field: Option<String>, name: &str) -> Result<String, ApiError> {
    match field {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(KeyfoldError::BadRequest(format!("missing field: {name}")).into()),
    }
}

/// Current time as an ISO 8601 string with millisecond precision.
pub(crate) fn now_iso() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_rejects_missing_and_empty() {
        assert!(require(None, "ct").is_err());
        assert!(require(Some(String::new()), "ct").is_err());
        assert_eq!(require(Some("x".into()), "ct").unwrap(), "x");
    }

    #[test]
    fn blob_request_needs_both_fields() {
        let req = BlobRequest {
            ct: Some("Y3Q".into()),
            iv: None,
        };
        assert!(req.into_blob().is_err());

        let req = BlobRequest {
            ct: Some("Y3Q".into()),
            iv: Some("aXY".into()),
        };
        let blob = req.into_blob().unwrap();
        assert_eq!(blob.ct, "Y3Q");
    }
}
