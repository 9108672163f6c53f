// SPDX-FileCopyrightText: 2026 Dialdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of [`DocumentStore`].
//!
//! Every collection shares one `documents` table keyed by `(collection, id)`.
//! All statements run on tokio-rusqlite's single background thread, so the
//! read-merge-write in [`DocumentStore::update`] cannot interleave with
//! another write.

use std::time::Duration;

use async_trait::async_trait;
use rusqlite::{OptionalExtension, params};
use serde_json::Value;
use tracing::{debug, info};

use dialdesk_config::model::StorageConfig;
use dialdesk_core::traits::merge_top_level;
use dialdesk_core::{DialdeskError, Document, DocumentStore, HealthStatus};

use crate::migrations::run_migrations;

/// Convert a tokio-rusqlite error into `DialdeskError::Storage`.
fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> DialdeskError {
    DialdeskError::storage(e)
}

/// SQLite-backed document store.
pub struct SqliteDocumentStore {
    path: String,
    conn: tokio_rusqlite::Connection,
}

impl SqliteDocumentStore {
    /// Open the database named by `config.database_path`, creating parent
    /// directories and applying migrations.
    pub async fn open(config: &StorageConfig) -> Result<Self, DialdeskError> {
        let path = std::path::Path::new(&config.database_path);
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(DialdeskError::storage)?;
            }
        }
        let conn = tokio_rusqlite::Connection::open(&config.database_path)
            .await
            .map_err(DialdeskError::storage)?;
        Self::prepare(config.database_path.clone(), conn, config.wal_mode).await
    }

    /// Open a private in-memory database.
    pub async fn open_in_memory() -> Result<Self, DialdeskError> {
        let conn = tokio_rusqlite::Connection::open_in_memory()
            .await
            .map_err(DialdeskError::storage)?;
        Self::prepare(":memory:".to_string(), conn, false).await
    }

    async fn prepare(
        path: String,
        conn: tokio_rusqlite::Connection,
        wal_mode: bool,
    ) -> Result<Self, DialdeskError> {
        let journal = conn
            .call(move |conn| -> Result<String, DialdeskError> {
                conn.busy_timeout(Duration::from_secs(5))
                    .map_err(DialdeskError::storage)?;
                let journal = if wal_mode {
                    conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| {
                        row.get::<_, String>(0)
                    })
                    .map_err(DialdeskError::storage)?
                } else {
                    conn.pragma_query_value(None, "journal_mode", |row| row.get::<_, String>(0))
                        .map_err(DialdeskError::storage)?
                };
                run_migrations(conn)?;
                Ok(journal)
            })
            .await
            .map_err(DialdeskError::storage)?;

        info!(path = %path, journal_mode = %journal, "document store opened");
        Ok(Self { path, conn })
    }

    /// Path this store was opened from (`:memory:` for in-memory stores).
    pub fn path(&self) -> &str {
        &self.path
    }
}

#[async_trait]
impl DocumentStore for SqliteDocumentStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn create(&self, collection: &str, id: &str, body: Value) -> Result<(), DialdeskError> {
        let (collection, id) = (collection.to_string(), id.to_string());
        let inserted = self
            .conn
            .call({
                let (collection, id) = (collection.clone(), id.clone());
                move |conn| {
                    conn.execute(
                        "INSERT INTO documents (collection, id, body) VALUES (?1, ?2, ?3)
                         ON CONFLICT(collection, id) DO NOTHING",
                        params![collection, id, body],
                    )
                }
            })
            .await
            .map_err(map_tr_err)?;

        if inserted == 0 {
            return Err(DialdeskError::conflict(format!(
                "document `{collection}/{id}` already exists"
            )));
        }
        debug!(collection = %collection, id = %id, "document created");
        Ok(())
    }

    async fn read(&self, collection: &str, id: &str) -> Result<Option<Value>, DialdeskError> {
        let (collection, id) = (collection.to_string(), id.to_string());
        self.conn
            .call(move |conn| {
                conn.query_row(
                    "SELECT body FROM documents WHERE collection = ?1 AND id = ?2",
                    params![collection, id],
                    |row| row.get::<_, Value>(0),
                )
                .optional()
            })
            .await
            .map_err(map_tr_err)
    }

    async fn list(&self, collection: &str) -> Result<Vec<Document>, DialdeskError> {
        let collection = collection.to_string();
        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT id, body FROM documents WHERE collection = ?1 ORDER BY seq",
                )?;
                let rows = stmt.query_map(params![collection], |row| {
                    Ok(Document {
                        id: row.get(0)?,
                        body: row.get(1)?,
                    })
                })?;
                rows.collect::<Result<Vec<_>, _>>()
            })
            .await
            .map_err(map_tr_err)
    }

    async fn update(&self, collection: &str, id: &str, patch: Value) -> Result<(), DialdeskError> {
        let (collection, id) = (collection.to_string(), id.to_string());
        self.conn
            .call(move |conn| {
                let tx = conn.transaction()?;
                let existing = tx
                    .query_row(
                        "SELECT body FROM documents WHERE collection = ?1 AND id = ?2",
                        params![collection, id],
                        |row| row.get::<_, Value>(0),
                    )
                    .optional()?;
                let body = match existing {
                    Some(mut body) => {
                        merge_top_level(&mut body, patch);
                        body
                    }
                    None => patch,
                };
                tx.execute(
                    "INSERT INTO documents (collection, id, body) VALUES (?1, ?2, ?3)
                     ON CONFLICT(collection, id) DO UPDATE SET body = excluded.body",
                    params![collection, id, body],
                )?;
                tx.commit()
            })
            .await
            .map_err(map_tr_err)
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), DialdeskError> {
        let (collection, id) = (collection.to_string(), id.to_string());
        self.conn
            .call(move |conn| {
                conn.execute(
                    "DELETE FROM documents WHERE collection = ?1 AND id = ?2",
                    params![collection, id],
                )?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
    }

    async fn health_check(&self) -> Result<HealthStatus, DialdeskError> {
        let result = self
            .conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.query_row("SELECT 1", [], |_| Ok(()))?;
                Ok(())
            })
            .await;
        match result {
            Ok(()) => Ok(HealthStatus::Healthy),
            Err(e) => Ok(HealthStatus::Unhealthy(format!("SQLite health check failed: {e}"))),
        }
    }

    async fn close(&self) -> Result<(), DialdeskError> {
        // Fold the WAL back into the main file so the database is self-contained.
        self.conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.query_row("PRAGMA wal_checkpoint(TRUNCATE)", [], |_| Ok(()))?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        debug!(path = %self.path, "document store checkpointed");
        Ok(())
    }
}
