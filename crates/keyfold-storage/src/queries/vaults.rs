// SPDX-FileCopyrightText: 2026 Keyfold Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed vault records: create, fetch, list, and blob replacement.

use keyfold_core::KeyfoldError;
use rusqlite::params;

use crate::database::{Database, map_tr_err};
use crate::models::{VaultBlob, VaultKind, VaultMember, VaultRecord, VaultSummary};

use super::parse_column;

/// Insert a vault record and its member rows in one transaction.
pub async fn create_vault(db: &Database, vault: &VaultRecord) -> Result<(), KeyfoldError> {
    let vault = vault.clone();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            tx.execute(
                "INSERT INTO vaults (id, owner_id, name, kind, ct, iv, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    vault.id,
                    vault.owner_id,
                    vault.name,
                    vault.kind.to_string(),
                    vault.blob.as_ref().map(|b| b.ct.clone()),
                    vault.blob.as_ref().map(|b| b.iv.clone()),
                    vault.created_at,
                    vault.updated_at,
                ],
            )?;
            for member in &vault.members {
                tx.execute(
                    "INSERT INTO vault_members (vault_id, user_id, email, role, last_seen_at)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                    params![
                        vault.id,
                        member.user_id,
                        member.email,
                        member.role.to_string(),
                        member.last_seen_at,
                    ],
                )?;
            }
            tx.commit()?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Fetch a vault record with its member list.
pub async fn get_vault(db: &Database, id: &str) -> Result<Option<VaultRecord>, KeyfoldError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, owner_id, name, kind, ct, iv, created_at, updated_at
                 FROM vaults WHERE id = ?1",
            )?;
            let row = stmt.query_row(params![id], |row| {
                let kind: String = row.get(3)?;
                let ct: Option<String> = row.get(4)?;
                let iv: Option<String> = row.get(5)?;
                Ok(VaultRecord {
                    id: row.get(0)?,
                    owner_id: row.get(1)?,
                    name: row.get(2)?,
                    kind: parse_column::<VaultKind>(3, kind)?,
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
                "SELECT user_id, email, role, last_seen_at
                 FROM vault_members WHERE vault_id = ?1 ORDER BY rowid",
            )?;
            let members = stmt
                .query_map(params![vault.id], |row| {
                    let role: String = row.get(2)?;
                    Ok(VaultMember {
                        user_id: row.get(0)?,
                        email: row.get(1)?,
                        role: parse_column(2, role)?,
                        last_seen_at: row.get(3)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            vault.members = members;
            Ok(Some(vault))
        })
        .await
        .map_err(map_tr_err)
}

/// List every vault the user owns or appears in as a member.
pub async fn list_vaults_for_user(
    db: &Database,
    user_id: &str,
) -> Result<Vec<VaultSummary>, KeyfoldError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT DISTINCT v.id, v.name, v.kind, v.owner_id
                 FROM vaults v
                 LEFT JOIN vault_members m ON m.vault_id = v.id
                 WHERE v.owner_id = ?1 OR m.user_id = ?1
                 ORDER BY v.created_at",
            )?;
            let rows = stmt
                .query_map(params![user_id], |row| {
                    let kind: String = row.get(2)?;
                    Ok(VaultSummary {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        kind: parse_column(2, kind)?,
                        owner_id: row.get(3)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
        .await
        .map_err(map_tr_err)
}

/// Replace a vault's blob. Returns false if the vault does not exist.
pub async fn save_vault_blob(
    db: &Database,
    id: &str,
    blob: &VaultBlob,
) -> Result<bool, KeyfoldError> {
    let id = id.to_string();
    let blob = blob.clone();
    db.connection()
        .call(move |conn| {
            let changed = conn.execute(
                "UPDATE vaults SET ct = ?1, iv = ?2,
                        updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                 WHERE id = ?3",
                params![blob.ct, blob.iv, id],
            )?;
            Ok(changed > 0)
        })
        .await
        .map_err(map_tr_err)
}
