// SPDX-FileCopyrightText: 2026 Keyfold Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Keyfold vault server.
//!
//! Provides the error taxonomy, the domain model (users, vaults, shared
//! vaults, members), and the pure access-control rules that every mutating
//! operation consults. No I/O lives here.

pub mod access;
pub mod error;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use access::{JoinPlan, VaultAccess};
pub use error::KeyfoldError;
pub use types::{Identity, Member, Presence, Role, VaultBlob, VaultKind};
