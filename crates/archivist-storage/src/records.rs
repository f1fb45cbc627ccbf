//! Generic JSONB-backed record store, grounded on the teacher's
//! `PostgresSessionStorage` adapter pattern: one connection pool, rows
//! keyed by a string id, payload round-tripped through `serde_json` into
//! a `JSONB` column rather than a bespoke per-entity schema. Used by the
//! Task Controller for `CrawlTask` records and by the Vector Indexer for
//! `ProcessedDocument` records (spec §3, §4.10).
//!
//! ```sql
//! CREATE TABLE IF NOT EXISTS records (
//!     table_name TEXT NOT NULL,
//!     id TEXT NOT NULL,
//!     payload JSONB NOT NULL,
//!     updated_at TIMESTAMPTZ NOT NULL,
//!     PRIMARY KEY (table_name, id)
//! );
//! CREATE INDEX IF NOT EXISTS idx_records_table_name ON records (table_name);
//! ```

use crate::error::StorageError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::instrument;

#[derive(Clone)]
pub struct RecordStore {
    pool: Arc<PgPool>,
}

impl RecordStore {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    #[instrument(skip(self, value))]
    pub async fn put<T: Serialize + Send + Sync>(
        &self,
        table: &'static str,
        id: &str,
        value: &T,
    ) -> Result<(), StorageError> {
        let payload = serde_json::to_value(value)?;
        sqlx::query(
            "INSERT INTO records (table_name, id, payload, updated_at) VALUES ($1, $2, $3, now()) \
             ON CONFLICT (table_name, id) DO UPDATE SET payload = EXCLUDED.payload, updated_at = now()",
        )
        .bind(table)
        .bind(id)
        .bind(payload)
        .execute(&*self.pool)
        .await?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn get<T: DeserializeOwned>(
        &self,
        table: &'static str,
        id: &str,
    ) -> Result<Option<T>, StorageError> {
        let row: Option<(serde_json::Value,)> =
            sqlx::query_as("SELECT payload FROM records WHERE table_name = $1 AND id = $2")
                .bind(table)
                .bind(id)
                .fetch_optional(&*self.pool)
                .await?;
        match row {
            Some((payload,)) => Ok(Some(serde_json::from_value(payload)?)),
            None => Ok(None),
        }
    }

    #[instrument(skip(self))]
    pub async fn list<T: DeserializeOwned>(&self, table: &'static str) -> Result<Vec<T>, StorageError> {
        let rows: Vec<(serde_json::Value,)> =
            sqlx::query_as("SELECT payload FROM records WHERE table_name = $1")
                .bind(table)
                .fetch_all(&*self.pool)
                .await?;
        rows.into_iter()
            .map(|(payload,)| serde_json::from_value(payload).map_err(StorageError::from))
            .collect()
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, table: &'static str, id: &str) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM records WHERE table_name = $1 AND id = $2")
            .bind(table)
            .bind(id)
            .execute(&*self.pool)
            .await?;
        Ok(())
    }
}
