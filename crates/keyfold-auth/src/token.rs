// SPDX-FileCopyrightText: 2026 Keyfold Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Signed bearer tokens carrying `{userId, email}` claims.
//!
//! Format: `base64url(claims JSON) "." base64url(HMAC-SHA256 over the
//! encoded claims)`. The signing secret and expiry window are explicit
//! constructor parameters, never process-wide state. Verification is pure
//! computation and safe to call concurrently.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use hmac::{Hmac, Mac};
use keyfold_core::{Identity, KeyfoldError};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Token claims. `sub` is the user id; `exp` is a Unix timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub exp: i64,
}

/// Issues and verifies signed bearer tokens.
#[derive(Clone)]
pub struct TokenSigner {
    secret: Vec<u8>,
    ttl: chrono::Duration,
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSigner")
            .field("secret", &"[redacted]")
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl TokenSigner {
    /// Create a signer with the given secret and token lifetime in days.
    pub fn new(secret: impl Into<Vec<u8>>, ttl_days: i64) -> Self {
        Self {
            secret: secret.into(),
            ttl: chrono::Duration::days(ttl_days),
        }
    }

    /// Issue a token for the given identity, expiring after the configured TTL.
    pub fn issue(&self, user_id: &str, email: &str) -> Result<String, KeyfoldError> {
        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            exp: (chrono::Utc::now() + self.ttl).timestamp(),
        };
        let payload = serde_json::to_vec(&claims)
            .map_err(|e| KeyfoldError::Internal(format!("claims serialization failed: {e}")))?;
        let encoded = URL_SAFE_NO_PAD.encode(payload);
        let signature = self.sign(encoded.as_bytes())?;
        Ok(format!("{encoded}.{}", URL_SAFE_NO_PAD.encode(signature)))
    }

    /// Verify a token's signature and expiry, returning the embedded identity.
    pub fn verify(&self, token: &str) -> Result<Identity, KeyfoldError> {
        let invalid = || KeyfoldError::Unauthorized("invalid token".to_string());

        let (encoded, sig_b64) = token.split_once('.').ok_or_else(invalid)?;
        let sig_bytes = URL_SAFE_NO_PAD.decode(sig_b64).map_err(|_| invalid())?;

        let mut mac = self.mac()?;
        mac.update(encoded.as_bytes());
        mac.verify_slice(&sig_bytes).map_err(|_| invalid())?;

        let payload = URL_SAFE_NO_PAD.decode(encoded).map_err(|_| invalid())?;
        let claims: Claims = serde_json::from_slice(&payload).map_err(|_| invalid())?;

        if claims.exp <= chrono::Utc::now().timestamp() {
            return Err(KeyfoldError::Unauthorized("token expired".to_string()));
        }

        Ok(Identity {
            user_id: claims.sub,
            email: claims.email,
        })
    }

    fn mac(&self) -> Result<HmacSha256, KeyfoldError> {
        HmacSha256::new_from_slice(&self.secret)
            .map_err(|e| KeyfoldError::Internal(format!("invalid signing key: {e}")))
    }

    fn sign(&self, payload: &[u8]) -> Result<Vec<u8>, KeyfoldError> {
        let mut mac = self.mac()?;
        mac.update(payload);
        Ok(mac.finalize().into_bytes().to_vec())
    }
}
