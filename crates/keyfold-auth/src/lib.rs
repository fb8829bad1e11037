// SPDX-FileCopyrightText: 2026 Keyfold Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Credential primitives for the Keyfold vault server.
//!
//! Two concerns live here: slow salted hashing of login passwords and
//! shared-vault join secrets (argon2id, PHC strings), and stateless signed
//! bearer tokens (HMAC-SHA256). Registration and login flows compose these
//! with the storage layer in the gateway.

pub mod password;
pub mod token;

pub use password::{hash_secret, verify_secret};
pub use token::{Claims, TokenSigner};
