// SPDX-FileCopyrightText: 2026 Keyfold Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All writes are serialized through tokio-rusqlite's single background
//! thread: [`Database`] wraps one `tokio_rusqlite::Connection`, query
//! modules accept `&Database` and go through `connection().call()`, and
//! every `call()` closure runs exclusively on that thread. Do NOT create
//! additional Connection instances for writes.

use keyfold_core::KeyfoldError;
use tracing::debug;

/// Handle to the SQLite database. Cheap to clone; all clones share the
/// single writer thread.
#[derive(Clone)]
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Open (or create) the database at `path`, apply PRAGMAs, and run all
    /// pending migrations.
    pub async fn open(path: &str, wal_mode: bool) -> Result<Self, KeyfoldError> {
        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(|e| map_tr_err(tokio_rusqlite::Error::from(e)))?;

        conn.call(move |conn| {
            if wal_mode {
                conn.execute_batch("PRAGMA journal_mode=WAL;")?;
            }
            conn.execute_batch(
                "PRAGMA foreign_keys=ON;
                 PRAGMA synchronous=NORMAL;
                 PRAGMA busy_timeout=5000;",
            )?;
            Ok(crate::migrations::run_migrations(conn))
        })
        .await
        .map_err(map_tr_err)?
        .map_err(|e| KeyfoldError::Storage {
            source: Box::new(e),
        })?;

        debug!(path, wal_mode, "database opened");
        Ok(Self { conn })
    }

    /// The underlying tokio-rusqlite connection (single writer).
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Checkpoint the WAL. Call before shutdown.
    pub async fn close(&self) -> Result<(), KeyfoldError> {
        self.conn
            .call(|conn| {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        debug!("WAL checkpoint complete");
        Ok(())
    }
}

/// Map a tokio-rusqlite error into the storage error variant.
pub fn map_tr_err(e: tokio_rusqlite::Error) -> KeyfoldError {
    KeyfoldError::Storage {
        source: Box::new(e),
    }
}
