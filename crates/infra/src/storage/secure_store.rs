//! SQLCipher-backed secure key-value store
//!
//! One table, `kv(key TEXT PRIMARY KEY, value TEXT)`, in an encrypted
//! database file. Opening self-heals: a file that cannot be opened with the
//! current key is deleted and recreated empty, once.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use rusqlite::params;
use tokio::task;
use tracing::{debug, info, instrument};
use trainhub_common::storage::SqlCipherConnection;
use trainhub_common::{SecureString, SqlCipherPool, SqlCipherPoolConfig, StorageError};
use trainhub_core::SecureStore;
use trainhub_domain::{Result, TrainHubError};

use crate::errors::InfraError;

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS kv (key TEXT PRIMARY KEY, value TEXT)";

/// `SecureStore` over an encrypted SQLite file
#[derive(Debug, Clone)]
pub struct SqlCipherSecureStore {
    pool: Arc<SqlCipherPool>,
}

impl SqlCipherSecureStore {
    /// Open the store at `path` with the default pool settings.
    pub fn open(path: &Path, key: SecureString) -> Result<Self> {
        Self::open_with_config(path, key, SqlCipherPoolConfig::default())
    }

    /// # Errors
    /// Propagates the second failure if the store cannot be opened even
    /// after being recreated.
    #[instrument(skip(key, config), fields(path = %path.display()))]
    pub fn open_with_config(
        path: &Path,
        key: SecureString,
        config: SqlCipherPoolConfig,
    ) -> Result<Self> {
        let pool = SqlCipherPool::open_or_recreate(path, key, config).map_err(map_storage_error)?;

        let conn = pool.get_sqlcipher_connection().map_err(map_storage_error)?;
        conn.execute(SCHEMA, []).map_err(map_storage_error)?;
        drop(conn);

        info!("Secure store ready");
        Ok(Self { pool: Arc::new(pool) })
    }

    pub fn path(&self) -> &Path {
        self.pool.path()
    }

    async fn with_connection<T, F>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&SqlCipherConnection) -> std::result::Result<T, StorageError> + Send + 'static,
    {
        let pool = Arc::clone(&self.pool);
        task::spawn_blocking(move || -> Result<T> {
            let conn = pool.get_sqlcipher_connection().map_err(map_storage_error)?;
            op(&conn).map_err(map_storage_error)
        })
        .await
        .map_err(map_join_error)?
    }
}

#[async_trait]
impl SecureStore for SqlCipherSecureStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let key = key.to_string();
        self.with_connection(move |conn| {
            match conn.query_row("SELECT value FROM kv WHERE key = ?1", params![&key], |row| {
                row.get::<_, Option<String>>(0)
            }) {
                Ok(value) => Ok(value),
                Err(err) if err.is_no_rows() => Ok(None),
                Err(err) => Err(err),
            }
        })
        .await
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let key = key.to_string();
        let value = value.to_string();
        self.with_connection(move |conn| {
            conn.execute(
                "INSERT INTO kv (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                params![&key, &value],
            )?;
            debug!(key = %key, "Secure store entry written");
            Ok(())
        })
        .await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let key = key.to_string();
        self.with_connection(move |conn| {
            conn.execute("DELETE FROM kv WHERE key = ?1", params![&key])?;
            Ok(())
        })
        .await
    }
}

fn map_storage_error(err: StorageError) -> TrainHubError {
    InfraError::from(err).into()
}

fn map_join_error(err: task::JoinError) -> TrainHubError {
    if err.is_cancelled() {
        TrainHubError::Internal("blocking secure store task cancelled".into())
    } else {
        TrainHubError::Internal(format!("blocking secure store task failed: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tempfile::TempDir;
    use trainhub_domain::AuthToken;

    use super::*;

    fn fast_config() -> SqlCipherPoolConfig {
        SqlCipherPoolConfig {
            connection_timeout: Duration::from_secs(1),
            kdf_iter: 4_000,
            ..SqlCipherPoolConfig::default()
        }
    }

    fn open(dir: &TempDir, key: &str) -> SqlCipherSecureStore {
        SqlCipherSecureStore::open_with_config(
            &dir.path().join("secure.db"),
            SecureString::from(key),
            fast_config(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn token_roundtrip_and_removal() {
        let dir = TempDir::new().unwrap();
        let store = open(&dir, "key");

        assert!(store.get_token().await.unwrap().is_empty());
        store.set_token(&AuthToken::new("abc")).await.unwrap();
        assert_eq!(store.get_token().await.unwrap().expose(), "abc");

        store.set_token(&AuthToken::empty()).await.unwrap();
        assert!(store.get_token().await.unwrap().is_empty());
        assert_eq!(store.get("auth_token").await.unwrap(), None);
    }

    #[tokio::test]
    async fn values_survive_reopen() {
        let dir = TempDir::new().unwrap();
        {
            let store = open(&dir, "key");
            store.set_user(Some(r#"{"id":"u1"}"#)).await.unwrap();
            store.mark_launched().await.unwrap();
        }

        let store = open(&dir, "key");
        assert_eq!(store.get_user().await.unwrap().as_deref(), Some(r#"{"id":"u1"}"#));
        assert!(!store.is_first_launch().await.unwrap());
    }

    #[tokio::test]
    async fn overwrite_replaces_value() {
        let dir = TempDir::new().unwrap();
        let store = open(&dir, "key");

        store.set("serialized_user", "first").await.unwrap();
        store.set("serialized_user", "second").await.unwrap();
        assert_eq!(store.get("serialized_user").await.unwrap().as_deref(), Some("second"));
    }

    #[tokio::test]
    async fn lost_key_starts_over_empty() {
        let dir = TempDir::new().unwrap();
        {
            let store = open(&dir, "original");
            store.set_token(&AuthToken::new("abc")).await.unwrap();
            store.mark_launched().await.unwrap();
        }

        let store = open(&dir, "replacement");
        assert!(store.get_token().await.unwrap().is_empty());
        assert!(store.is_first_launch().await.unwrap());
    }
}
