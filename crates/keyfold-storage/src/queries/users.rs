// SPDX-FileCopyrightText: 2026 Keyfold Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User CRUD and personal-vault blob operations.

use keyfold_core::KeyfoldError;
use rusqlite::params;

use crate::database::{Database, map_tr_err};
use crate::models::{User, VaultBlob};

/// Create a new user. Fails with `Conflict` if the email is already taken.
pub async fn create_user(db: &Database, user: &User) -> Result<(), KeyfoldError> {
    let user = user.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO users (id, email, password_hash, salt, vault_ct, vault_iv, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    user.id,
                    user.email,
                    user.password_hash,
                    user.salt,
                    user.vault.as_ref().map(|b| b.ct.clone()),
                    user.vault.as_ref().map(|b| b.iv.clone()),
                    user.created_at,
                    user.updated_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(|e| match e {
            tokio_rusqlite::Error::Error(rusqlite::Error::SqliteFailure(f, _))
                if f.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                KeyfoldError::Conflict("account already exists".to_string())
            }
            other => map_tr_err(other),
        })
}

/// Get a user by email.
pub async fn get_user_by_email(db: &Database, email: &str) -> Result<Option<User>, KeyfoldError> {
    let email = email.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, email, password_hash, salt, vault_ct, vault_iv, created_at, updated_at
                 FROM users WHERE email = ?1",
            )?;
            match stmt.query_row(params![email], user_from_row) {
                Ok(user) => Ok(Some(user)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// Get a user by id.
pub async fn get_user_by_id(db: &Database, id: &str) -> Result<Option<User>, KeyfoldError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, email, password_hash, salt, vault_ct, vault_iv, created_at, updated_at
                 FROM users WHERE id = ?1",
            )?;
            match stmt.query_row(params![id], user_from_row) {
                Ok(user) => Ok(Some(user)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// Overwrite the personal vault blob. Returns false if the user is unknown.
pub async fn save_personal_vault(
    db: &Database,
    user_id: &str,
    blob: &VaultBlob,
) -> Result<bool, KeyfoldError> {
    let user_id = user_id.to_string();
    let blob = blob.clone();
    db.connection()
        .call(move |conn| {
            let changed = conn.execute(
                "UPDATE users SET vault_ct = ?1, vault_iv = ?2,
                        updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                 WHERE id = ?3",
                params![blob.ct, blob.iv, user_id],
            )?;
            Ok(changed > 0)
        })
        .await
        .map_err(map_tr_err)
}

/// Clear the personal vault blob. Irreversible. Returns false if the user is
/// unknown.
pub async fn reset_personal_vault(db: &Database, user_id: &str) -> Result<bool, KeyfoldError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            let changed = conn.execute(
                "UPDATE users SET vault_ct = NULL, vault_iv = NULL,
                        updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                 WHERE id = ?1",
                params![user_id],
            )?;
            Ok(changed > 0)
        })
        .await
        .map_err(map_tr_err)
}

fn user_from_row(row: &rusqlite::Row<'_>) -> Result<User, rusqlite::Error> {
    let ct: Option<String> = row.get(4)?;
    let iv: Option<String> = row.get(5)?;
    Ok(User {
        id: row.get(0)?,
        email: row.get(1)?,
        password_hash: row.get(2)?,
        salt: row.get(3)?,
        vault: match (ct, iv) {
            (Some(ct), Some(iv)) => Some(VaultBlob { ct, iv }),
            _ => None,
        },
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}
