// SPDX-FileCopyrightText: 2026 Keyfold Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared vaults: creation, membership mutation, presence, and blob access.
//!
//! Member rows with a NULL `user_id` are pending email invites; binding on
//! join fills the id in place, so member ordering is stable across the
//! invite/join cycle.

use keyfold_core::KeyfoldError;
use rusqlite::params;

use crate::database::{Database, map_tr_err};
use crate::models::{Member, Presence, Role, SharedVault, VaultBlob};

use super::parse_column;

/// Insert a shared vault and its initial member rows in one transaction.
pub async fn create_shared_vault(db: &Database, vault: &SharedVault) -> Result<(), KeyfoldError> {
    let vault = vault.clone();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            tx.execute(
                "INSERT INTO shared_vaults
                        (id, owner_id, name, join_password_hash, ct, iv, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    vault.id,
                    vault.owner_id,
                    vault.name,
                    vault.join_password_hash,
                    vault.blob.as_ref().map(|b| b.ct.clone()),
                    vault.blob.as_ref().map(|b| b.iv.clone()),
                    vault.created_at,
                    vault.updated_at,
                ],
            )?;
            for member in &vault.members {
                tx.execute(
                    "INSERT INTO shared_vault_members (vault_id, user_id, email, role, status)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                    params![
                        vault.id,
                        member.user_id(),
                        member.email(),
                        member.role().to_string(),
                        member.status().to_string(),
                    ],
                )?;
            }
            tx.commit()?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Fetch a shared vault with its full member list (insertion order).
pub async fn get_shared_vault(
    db: &Database,
    id: &str,
) -> Result<Option<SharedVault>, KeyfoldError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, owner_id, name, join_password_hash, ct, iv, created_at, updated_at
                 FROM shared_vaults WHERE id = ?1",
            )?;
            let row = stmt.query_row(params![id], |row| {
                let ct: Option<String> = row.get(4)?;
                let iv: Option<String> = row.get(5)?;
                Ok(SharedVault {
                    id: row.get(0)?,
                    owner_id: row.get(1)?,
                    name: row.get(2)?,
                    join_password_hash: row.get(3)?,
                    members: Vec::new(),
                    blob: match (ct, iv) {
                        (Some(ct), Some(iv)) => Some(VaultBlob { ct, iv }),
                        _ => None,
                    },
                    created_at: row.get(6)?,
                    updated_at: row.get(7)?,
                })
            });
            let mut vault = match row {
                Ok(v) => v,
                Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
                Err(e) => return Err(e.into()),
            };

            let mut stmt = conn.prepare(
                "SELECT user_id, email, role, status
                 FROM shared_vault_members WHERE vault_id = ?1 ORDER BY rowid",
            )?;
            let members = stmt
                .query_map(params![vault.id], |row| {
                    let user_id: Option<String> = row.get(0)?;
                    let email: String = row.get(1)?;
                    let role: Role = parse_column(2, row.get(2)?)?;
                    match user_id {
                        None => Ok(Member::Pending { email, role }),
                        Some(user_id) => {
                            let status: Presence = parse_column(3, row.get(3)?)?;
                            Ok(Member::Bound {
                                user_id,
                                email,
                                role,
                                status,
                            })
                        }
                    }
                })?
                .collect::<Result<Vec<_>, _>>()?;
            vault.members = members;
            Ok(Some(vault))
        })
        .await
        .map_err(map_tr_err)
}

/// Record an email-only invite. Duplicate emails map to `Conflict`.
pub async fn add_pending_member(
    db: &Database,
    vault_id: &str,
    email: &str,
) -> Result<(), KeyfoldError> {
    let vault_id = vault_id.to_string();
    let email = email.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO shared_vault_members (vault_id, user_id, email, role, status)
                 VALUES (?1, NULL, ?2, 'member', 'offline')",
                params![vault_id, email],
            )?;
            touch_vault(conn, &vault_id)?;
            Ok(())
        })
        .await
        .map_err(|e| match e {
            tokio_rusqlite::Error::Error(rusqlite::Error::SqliteFailure(f, _))
                if f.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                KeyfoldError::Conflict("member already invited".to_string())
            }
            other => map_tr_err(other),
        })
}

/// Bind a pending invite for `email` to a concrete user id, marking the
/// member online. Returns false if no pending invite matched.
pub async fn bind_member(
    db: &Database,
    vault_id: &str,
    email: &str,
    user_id: &str,
) -> Result<bool, KeyfoldError> {
    let vault_id = vault_id.to_string();
    let email = email.to_string();
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            let changed = conn.execute(
                "UPDATE shared_vault_members SET user_id = ?1, status = 'online'
                 WHERE vault_id = ?2 AND email = ?3 AND user_id IS NULL",
                params![user_id, vault_id, email],
            )?;
            if changed > 0 {
                touch_vault(conn, &vault_id)?;
            }
            Ok(changed > 0)
        })
        .await
        .map_err(map_tr_err)
}

/// Append a bound member row directly (uninvited join).
pub async fn add_bound_member(
    db: &Database,
    vault_id: &str,
    user_id: &str,
    email: &str,
) -> Result<(), KeyfoldError> {
    let vault_id = vault_id.to_string();
    let user_id = user_id.to_string();
    let email = email.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO shared_vault_members (vault_id, user_id, email, role, status)
                 VALUES (?1, ?2, ?3, 'member', 'online')",
                params![vault_id, user_id, email],
            )?;
            touch_vault(conn, &vault_id)?;
            Ok(())
        })
        .await
        .map_err(|e| match e {
            tokio_rusqlite::Error::Error(rusqlite::Error::SqliteFailure(f, _))
                if f.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                KeyfoldError::Conflict("member already present".to_string())
            }
            other => map_tr_err(other),
        })
}

/// Set a bound member's presence. Returns false if the user is not a bound
/// member of the vault.
pub async fn set_member_status(
    db: &Database,
    vault_id: &str,
    user_id: &str,
    status: Presence,
) -> Result<bool, KeyfoldError> {
    let vault_id = vault_id.to_string();
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            let changed = conn.execute(
                "UPDATE shared_vault_members
                 SET status = ?1, last_active = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                 WHERE vault_id = ?2 AND user_id = ?3",
                params![status.to_string(), vault_id, user_id],
            )?;
            Ok(changed > 0)
        })
        .await
        .map_err(map_tr_err)
}

/// Remove a bound member (leave or kick). Returns false if no row matched.
pub async fn remove_member(
    db: &Database,
    vault_id: &str,
    user_id: &str,
) -> Result<bool, KeyfoldError> {
    let vault_id = vault_id.to_string();
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            let changed = conn.execute(
                "DELETE FROM shared_vault_members WHERE vault_id = ?1 AND user_id = ?2",
                params![vault_id, user_id],
            )?;
            if changed > 0 {
                touch_vault(conn, &vault_id)?;
            }
            Ok(changed > 0)
        })
        .await
        .map_err(map_tr_err)
}

/// Delete a shared vault; member rows cascade. Returns false if unknown.
pub async fn delete_shared_vault(db: &Database, id: &str) -> Result<bool, KeyfoldError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let changed = conn.execute("DELETE FROM shared_vaults WHERE id = ?1", params![id])?;
            Ok(changed > 0)
        })
        .await
        .map_err(map_tr_err)
}

/// Replace the shared blob. Returns false if the vault does not exist.
pub async fn save_shared_blob(
    db: &Database,
    id: &str,
    blob: &VaultBlob,
) -> Result<bool, KeyfoldError> {
    let id = id.to_string();
    let blob = blob.clone();
    db.connection()
        .call(move |conn| {
            let changed = conn.execute(
                "UPDATE shared_vaults SET ct = ?1, iv = ?2,
                        updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                 WHERE id = ?3",
                params![blob.ct, blob.iv, id],
            )?;
            Ok(changed > 0)
        })
        .await
        .map_err(map_tr_err)
}

fn touch_vault(conn: &rusqlite::Connection, vault_id: &str) -> Result<(), rusqlite::Error> {
    conn.execute(
        "UPDATE shared_vaults SET updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
         WHERE id = ?1",
        params![vault_id],
    )?;
    Ok(())
}
