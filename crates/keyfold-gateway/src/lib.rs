// SPDX-FileCopyrightText: 2026 Keyfold Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for the Keyfold vault server.
//!
//! Exposes the REST API over axum: public registration/login routes plus
//! bearer-token-gated vault routes, with errors mapped onto a stable set of
//! status codes.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod server;

pub use error::{ApiError, ApiResult};
pub use server::{GatewayState, ServerConfig, router, start_server};
