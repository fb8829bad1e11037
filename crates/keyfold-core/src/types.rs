// SPDX-FileCopyrightText: 2026 Keyfold Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain model types shared across the Keyfold workspace.
//!
//! Timestamps are ISO 8601 strings throughout; the server never interprets
//! them beyond ordering. Blob fields (`ct`, `iv`) are opaque to the server
//! and must round-trip byte-for-byte.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// A verified identity extracted from a bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: String,
    pub email: String,
}

/// An opaque client-encrypted payload: ciphertext plus AES IV.
///
/// The server stores and serves these strings verbatim. Decryption happens
/// entirely client-side with a key derived from the user's master password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultBlob {
    pub ct: String,
    pub iv: String,
}

/// Role of a member within a vault. Roles are fixed at creation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Owner,
    Member,
}

/// Presence status of a shared-vault member. Stored, not propagated.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Presence {
    Online,
    Idle,
    Offline,
}

/// Kind of a typed vault record.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum VaultKind {
    Personal,
    Shared,
}

/// A shared-vault membership entry.
///
/// A member is `Pending` between the owner's email-only invite and the
/// invitee's first successful join, at which point it becomes `Bound` to a
/// concrete user id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Member {
    Pending {
        email: String,
        role: Role,
    },
    Bound {
        user_id: String,
        email: String,
        role: Role,
        status: Presence,
    },
}

impl Member {
    /// A pending email-only invite (always role `member`).
    pub fn pending(email: impl Into<String>) -> Self {
        Member::Pending {
            email: email.into(),
            role: Role::Member,
        }
    }

    /// A bound member with a concrete user id.
    pub fn bound(
        user_id: impl Into<String>,
        email: impl Into<String>,
        role: Role,
        status: Presence,
    ) -> Self {
        Member::Bound {
            user_id: user_id.into(),
            email: email.into(),
            role,
            status,
        }
    }

    pub fn email(&self) -> &str {
        match self {
            Member::Pending { email, .. } | Member::Bound { email, .. } => email,
        }
    }

    pub fn role(&self) -> Role {
        match self {
            Member::Pending { role, .. } | Member::Bound { role, .. } => *role,
        }
    }

    /// The bound user id, or `None` while the invite is pending.
    pub fn user_id(&self) -> Option<&str> {
        match self {
            Member::Pending { .. } => None,
            Member::Bound { user_id, .. } => Some(user_id),
        }
    }

    /// Presence status; pending invites report `offline`.
    pub fn status(&self) -> Presence {
        match self {
            Member::Pending { .. } => Presence::Offline,
            Member::Bound { status, .. } => *status,
        }
    }

    pub fn is_bound_to(&self, user_id: &str) -> bool {
        self.user_id() == Some(user_id)
    }
}

/// A registered user. The optional blob is the personal vault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    /// Client-side key-derivation salt; opaque to the server.
    pub salt: String,
    pub vault: Option<VaultBlob>,
    pub created_at: String,
    pub updated_at: String,
}

/// A membership entry of a typed vault record (no presence tracking).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VaultMember {
    pub user_id: Option<String>,
    pub email: String,
    pub role: Role,
    pub last_seen_at: Option<String>,
}

/// A typed vault record owned by exactly one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultRecord {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub kind: VaultKind,
    pub members: Vec<VaultMember>,
    pub blob: Option<VaultBlob>,
    pub created_at: String,
    pub updated_at: String,
}

/// Listing row for typed vaults (no blob, no member list).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VaultSummary {
    pub id: String,
    pub name: String,
    pub kind: VaultKind,
    pub owner_id: String,
}

/// A named shared vault: one encrypted blob, one owner, many members.
///
/// The join secret is stored only as an argon2 hash and is never returned
/// to clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedVault {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub join_password_hash: String,
    pub members: Vec<Member>,
    pub blob: Option<VaultBlob>,
    pub created_at: String,
    pub updated_at: String,
}
