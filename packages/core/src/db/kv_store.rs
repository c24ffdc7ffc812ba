//! Durable Key/Value Storage
//!
//! String keys to string values, visible to every tab that shares the
//! database. The session binder keeps its tab associations, the global
//! "current note" pointer and the last sweep timestamp here.

use crate::db::database::DatabaseHandle;
use crate::db::error::StorageError;
use async_trait::async_trait;
use std::sync::Arc;

/// Durable, cross-tab key/value storage
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Insert or overwrite
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removing an absent key is not an error
    async fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// Every key starting with `prefix`, sorted ascending
    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, StorageError>;
}

/// `kv_store` table backed implementation
#[derive(Debug, Clone)]
pub struct LibsqlKeyValueStore {
    handle: Arc<DatabaseHandle>,
}

impl LibsqlKeyValueStore {
    pub fn new(handle: Arc<DatabaseHandle>) -> Self {
        Self { handle }
    }

    async fn connection(&self) -> Result<libsql::Connection, StorageError> {
        self.handle.get().await?.connect_with_timeout().await
    }
}

#[async_trait]
impl KeyValueStore for LibsqlKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let conn = self.connection().await?;
        let mut rows = conn
            .query("SELECT value FROM kv_store WHERE key = ?", [key])
            .await
            .map_err(|e| StorageError::query_failed(format!("Failed to read '{}': {}", key, e)))?;

        match rows
            .next()
            .await
            .map_err(|e| StorageError::query_failed(e.to_string()))?
        {
            Some(row) => Ok(Some(row.get::<String>(0)?)),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let conn = self.connection().await?;
        conn.execute(
            "INSERT INTO kv_store (key, value) VALUES (?, ?)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            (key, value),
        )
        .await
        .map_err(|e| StorageError::write_failed(format!("Failed to write '{}': {}", key, e)))?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let conn = self.connection().await?;
        conn.execute("DELETE FROM kv_store WHERE key = ?", [key])
            .await
            .map_err(|e| {
                StorageError::write_failed(format!("Failed to remove '{}': {}", key, e))
            })?;
        Ok(())
    }

    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        let conn = self.connection().await?;
        // substr comparison instead of LIKE so '%' and '_' in prefixes stay literal
        let mut rows = conn
            .query(
                "SELECT key FROM kv_store WHERE substr(key, 1, length(?1)) = ?1 ORDER BY key",
                [prefix],
            )
            .await
            .map_err(|e| {
                StorageError::query_failed(format!("Failed to list keys '{}*': {}", prefix, e))
            })?;

        let mut keys = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| StorageError::query_failed(e.to_string()))?
        {
            keys.push(row.get::<String>(0)?);
        }
        Ok(keys)
    }
}
