// SPDX-FileCopyrightText: 2026 Keyfold Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Access-control rules for vault operations.
//!
//! Pure functions over in-memory state: the storage layer loads a vault
//! document, these functions decide what the caller may do, and the handler
//! applies the corresponding mutation. Ownership is checked against the
//! vault's `owner_id`; membership counts only once a member is bound to a
//! user id (pending invites grant nothing).

use crate::types::{Identity, Member};

/// The caller's relationship to a target vault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VaultAccess {
    Owner,
    Member,
    NotMember,
}

impl VaultAccess {
    pub fn is_owner(self) -> bool {
        matches!(self, VaultAccess::Owner)
    }

    /// Whether the caller may read or write the vault's blob and metadata.
    pub fn is_member_or_owner(self) -> bool {
        !matches!(self, VaultAccess::NotMember)
    }
}

/// Compute the caller's access level from the owner id and the member list.
///
/// Works for both shared vaults and typed vault records: callers pass the
/// bound user id of each member (`None` for pending invites).
pub fn evaluate<'a>(
    owner_id: &str,
    member_ids: impl IntoIterator<Item = Option<&'a str>>,
    user_id: &str,
) -> VaultAccess {
    if owner_id == user_id {
        return VaultAccess::Owner;
    }
    if member_ids.into_iter().flatten().any(|id| id == user_id) {
        VaultAccess::Member
    } else {
        VaultAccess::NotMember
    }
}

/// Convenience for shared-vault member lists.
pub fn evaluate_shared(owner_id: &str, members: &[Member], user_id: &str) -> VaultAccess {
    evaluate(owner_id, members.iter().map(Member::user_id), user_id)
}

/// The mutation a successful join should apply. Computed before the join
/// secret is verified has no effect: callers must check the secret first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinPlan {
    /// A pending invite matches the caller's email: bind it and go online.
    BindPending,
    /// The caller is already a bound member: set status online, nothing else.
    Rejoin,
    /// No matching entry: append a fresh `member`-role record.
    Append,
    /// The caller's email is bound to a different user id.
    EmailTaken,
}

/// Decide how a join by `identity` changes the member list.
///
/// Precedence follows the join semantics: a pending invite matching the
/// caller's email binds first; an existing bound membership re-joins
/// idempotently; otherwise the caller is appended as a new member.
pub fn plan_join(members: &[Member], identity: &Identity) -> JoinPlan {
    if let Some(by_email) = members.iter().find(|m| m.email() == identity.email) {
        return match by_email.user_id() {
            None => JoinPlan::BindPending,
            Some(id) if id == identity.user_id => JoinPlan::Rejoin,
            Some(_) => JoinPlan::EmailTaken,
        };
    }
    if members.iter().any(|m| m.is_bound_to(&identity.user_id)) {
        JoinPlan::Rejoin
    } else {
        JoinPlan::Append
    }
}
