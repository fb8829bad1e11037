// SPDX-FileCopyrightText: 2026 Keyfold Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain model types for storage entities.
//!
//! The canonical types are defined in `keyfold-core::types` for use across
//! crate boundaries. This module re-exports them for convenience within the
//! storage crate.

pub use keyfold_core::types::{
    Member, Presence, Role, SharedVault, User, VaultBlob, VaultKind, VaultMember, VaultRecord,
    VaultSummary,
};
