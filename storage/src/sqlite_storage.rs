//! SQLite-backed [`Storage`]: one row per state key.
//!
//! Uses SqlitePoolManager. Every batch write runs inside one transaction; the
//! e-tag check is folded into the INSERT/UPDATE statement so a stale write
//! affects zero rows and rolls the batch back.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::StorageError;
use crate::models::StoreItem;
use crate::sqlite_pool::SqlitePoolManager;
use crate::storage::Storage;

#[derive(Clone)]
pub struct SqliteStorage {
    pool_manager: SqlitePoolManager,
}

impl SqliteStorage {
    pub async fn new(database_url: &str) -> Result<Self, StorageError> {
        let pool_manager = SqlitePoolManager::new(database_url).await?;
        let storage = Self { pool_manager };
        storage.init().await?;
        Ok(storage)
    }

    async fn init(&self) -> Result<(), sqlx::Error> {
        info!("Creating state table if not exist");

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS bot_state (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                e_tag TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(self.pool_manager.pool())
        .await?;

        Ok(())
    }

    /// Serialized JSON of the record as last written.
    pub async fn raw(&self, key: &str) -> Result<Option<String>, StorageError> {
        let row: Option<(String,)> = sqlx::query_as("SELECT value FROM bot_state WHERE key = ?")
            .bind(key)
            .fetch_optional(self.pool_manager.pool())
            .await?;
        Ok(row.map(|r| r.0))
    }
}

#[async_trait]
impl Storage for SqliteStorage {
    async fn read(&self, keys: &[String]) -> Result<HashMap<String, StoreItem>, StorageError> {
        let pool = self.pool_manager.pool();
        let mut items = HashMap::with_capacity(keys.len());

        for key in keys {
            let row: Option<(String, String)> =
                sqlx::query_as("SELECT value, e_tag FROM bot_state WHERE key = ?")
                    .bind(key)
                    .fetch_optional(pool)
                    .await?;
            if let Some((json, e_tag)) = row {
                let value = serde_json::from_str(&json)?;
                items.insert(key.clone(), StoreItem::new(value, Some(e_tag)));
            }
        }

        debug!(requested = keys.len(), found = items.len(), "SQLite storage read");
        Ok(items)
    }

    async fn write(
        &self,
        changes: HashMap<String, StoreItem>,
    ) -> Result<HashMap<String, String>, StorageError> {
        let mut tx = self.pool_manager.pool().begin().await?;
        let mut e_tags = HashMap::with_capacity(changes.len());
        let now = Utc::now();

        for (key, item) in &changes {
            let json = serde_json::to_string(&item.value)?;
            let new_e_tag = Uuid::new_v4().to_string();

            let result = match item.e_tag.as_deref() {
                _ if item.is_wildcard() => {
                    sqlx::query(
                        r#"
                        INSERT INTO bot_state (key, value, e_tag, updated_at)
                        VALUES (?, ?, ?, ?)
                        ON CONFLICT(key) DO UPDATE SET
                            value = excluded.value,
                            e_tag = excluded.e_tag,
                            updated_at = excluded.updated_at
                        "#,
                    )
                    .bind(key)
                    .bind(&json)
                    .bind(&new_e_tag)
                    .bind(now)
                    .execute(&mut *tx)
                    .await?
                }
                None => {
                    sqlx::query(
                        r#"
                        INSERT INTO bot_state (key, value, e_tag, updated_at)
                        VALUES (?, ?, ?, ?)
                        ON CONFLICT(key) DO NOTHING
                        "#,
                    )
                    .bind(key)
                    .bind(&json)
                    .bind(&new_e_tag)
                    .bind(now)
                    .execute(&mut *tx)
                    .await?
                }
                Some(expected) => {
                    sqlx::query(
                        "UPDATE bot_state SET value = ?, e_tag = ?, updated_at = ? WHERE key = ? AND e_tag = ?",
                    )
                    .bind(&json)
                    .bind(&new_e_tag)
                    .bind(now)
                    .bind(key)
                    .bind(expected)
                    .execute(&mut *tx)
                    .await?
                }
            };

            if result.rows_affected() == 0 {
                warn!(key = %key, "SQLite storage write conflict, rolling back batch");
                tx.rollback().await?;
                return Err(StorageError::Conflict { key: key.clone() });
            }
            e_tags.insert(key.clone(), new_e_tag);
        }

        tx.commit().await?;
        info!(written = e_tags.len(), "SQLite storage write committed");
        Ok(e_tags)
    }

    async fn delete(&self, keys: &[String]) -> Result<(), StorageError> {
        let pool = self.pool_manager.pool();
        for key in keys {
            sqlx::query("DELETE FROM bot_state WHERE key = ?")
                .bind(key)
                .execute(pool)
                .await?;
        }
        Ok(())
    }
}
