// SPDX-FileCopyrightText: 2026 Keyfold Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed query modules. Each function takes `&Database` and runs its SQL on
//! the single writer thread via `connection().call()`.

pub mod shared_vaults;
pub mod users;
pub mod vaults;

use std::str::FromStr;

/// Parse a stored enum column, mapping parse failures onto the rusqlite
/// conversion error for the given column index.
fn parse_column<T>(idx: usize, raw: String) -> Result<T, rusqlite::Error>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    T::from_str(&raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}
