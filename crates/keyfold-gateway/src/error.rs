// SPDX-FileCopyrightText: 2026 Keyfold Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP error mapping.
//!
//! Every handler failure is a [`KeyfoldError`]; this module maps the
//! request-level variants onto their fixed status codes and serializes the
//! `{"error": "..."}` body. Operational failures (storage, internal) are
//! logged and surfaced as opaque 500s.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use keyfold_core::KeyfoldError;

use crate::handlers::ErrorResponse;

/// Handler result alias.
pub type ApiResult<T> = Result<T, ApiError>;

/// Newtype so `KeyfoldError` can implement `IntoResponse`.
#[derive(Debug)]
pub struct ApiError(pub KeyfoldError);

impl From<KeyfoldError> for ApiError {
    fn from(err: KeyfoldError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            KeyfoldError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
            KeyfoldError::Unauthorized(m) => (StatusCode::UNAUTHORIZED, m.clone()),
            KeyfoldError::Forbidden(m) => (StatusCode::FORBIDDEN, m.clone()),
            KeyfoldError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
            KeyfoldError::Conflict(m) => (StatusCode::CONFLICT, m.clone()),
            KeyfoldError::Config(_) | KeyfoldError::Storage { .. } | KeyfoldError::Internal(_) => {
                tracing::error!(error = %self.0, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal error".to_string(),
                )
            }
        };
        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
