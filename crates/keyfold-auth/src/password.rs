// SPDX-FileCopyrightText: 2026 Keyfold Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Argon2id hashing for login passwords and shared-vault join secrets.
//!
//! Secrets are stored only as PHC strings (`$argon2id$...`), which embed the
//! salt and cost parameters, so verification needs no side table. Join
//! secrets go through the same path as login passwords: never stored or
//! compared in plaintext.

use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use keyfold_core::KeyfoldError;
use rand::RngCore;

/// Hash a secret with Argon2id and a fresh random salt.
pub fn hash_secret(plain: &str) -> Result<String, KeyfoldError> {
    let mut salt_bytes = [0u8; 16];
    rand::rngs::OsRng.fill_bytes(&mut salt_bytes);
    let salt = SaltString::encode_b64(&salt_bytes)
        .map_err(|e| KeyfoldError::Internal(format!("salt encoding failed: {e}")))?;

    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| KeyfoldError::Internal(format!("password hashing failed: {e}")))
}

/// Verify a secret against a stored PHC string.
///
/// Returns `Ok(false)` on mismatch; `Err` only if the stored hash itself is
/// malformed, which indicates data corruption rather than a bad guess.
pub fn verify_secret(plain: &str, phc: &str) -> Result<bool, KeyfoldError> {
    let parsed = PasswordHash::new(phc)
        .map_err(|e| KeyfoldError::Internal(format!("stored hash is malformed: {e}")))?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}
