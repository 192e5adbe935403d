//! SQLCipher connection pool
//!
//! r2d2 pool of encrypted SQLite connections. Every connection gets the key
//! and pragmas applied by the manager's init hook.

use std::path::{Path, PathBuf};

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use tracing::{debug, info, instrument, warn};

use super::cipher::{configure_sqlcipher, verify_encryption, SqlCipherConfig};
use super::config::SqlCipherPoolConfig;
use super::connection::SqlCipherConnection;
use super::pragmas::apply_connection_pragmas;
use crate::security::SecureString;
use crate::storage::error::{looks_like_wrong_key, StorageError, StorageResult};

/// SQLCipher connection pool
#[derive(Debug)]
pub struct SqlCipherPool {
    pool: Pool<SqliteConnectionManager>,
    config: SqlCipherPoolConfig,
    path: PathBuf,
}

impl SqlCipherPool {
    /// Open (or create) the encrypted database at `path`.
    ///
    /// # Errors
    /// `WrongKeyOrNotEncrypted` when the file exists but the key does not
    /// decrypt it, `Connection` for anything else that stops the pool from
    /// handing out a verified connection.
    #[instrument(skip(encryption_key), fields(db_path = ?path, pool_size = config.max_size))]
    pub fn new(
        path: &Path,
        encryption_key: SecureString,
        config: SqlCipherPoolConfig,
    ) -> StorageResult<Self> {
        info!("Creating SQLCipher connection pool");

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let cipher_config = SqlCipherConfig::new(encryption_key).with_kdf_iter(config.kdf_iter);
        let pragma_config = config.clone();

        let manager = SqliteConnectionManager::file(path).with_init(move |conn| {
            configure_sqlcipher(conn, &cipher_config)
                .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
            apply_connection_pragmas(conn, &pragma_config)
                .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
            Ok(())
        });

        let pool = Pool::builder()
            .max_size(config.max_size)
            .min_idle(Some(0))
            .connection_timeout(config.connection_timeout)
            .build(manager)
            .map_err(|e| classify_pool_error("Failed to create pool", &e))?;

        {
            let conn = pool
                .get()
                .map_err(|e| classify_pool_error("Failed to get test connection", &e))?;
            verify_encryption(&conn)?;
            debug!("Encryption verified successfully");
        }

        info!("SQLCipher pool created with {} connections", config.max_size);
        Ok(Self { pool, config, path: path.to_path_buf() })
    }

    /// Open the store, discarding it once if it cannot be opened.
    ///
    /// A store that fails to open (corrupt file, key lost from the keychain)
    /// is deleted together with its `-wal`/`-shm` siblings and recreated
    /// empty. A second failure is returned to the caller.
    #[instrument(skip(encryption_key, config), fields(db_path = ?path))]
    pub fn open_or_recreate(
        path: &Path,
        encryption_key: SecureString,
        config: SqlCipherPoolConfig,
    ) -> StorageResult<Self> {
        match Self::new(path, encryption_key.clone(), config.clone()) {
            Ok(pool) => Ok(pool),
            Err(first) => {
                warn!(error = %first, "Secure store unreadable, recreating it");
                remove_database_files(path)?;
                Self::new(path, encryption_key, config)
            }
        }
    }

    /// Get a connection from the pool.
    #[instrument(skip(self), fields(pool_size = self.config.max_size))]
    pub fn get_sqlcipher_connection(&self) -> StorageResult<SqlCipherConnection> {
        self.pool
            .get()
            .map(SqlCipherConnection::new)
            .map_err(|e| {
                warn!(error = %e, "Failed to acquire connection");
                StorageError::Timeout(self.config.connection_timeout.as_secs())
            })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> &SqlCipherPoolConfig {
        &self.config
    }
}

fn classify_pool_error(context: &str, error: &r2d2::Error) -> StorageError {
    warn!("{context}: {error}");
    if looks_like_wrong_key(&error.to_string()) {
        StorageError::WrongKeyOrNotEncrypted
    } else {
        StorageError::Connection(format!("{context}: {error}"))
    }
}

fn remove_database_files(path: &Path) -> StorageResult<()> {
    let mut targets = vec![path.to_path_buf()];
    for suffix in ["-wal", "-shm"] {
        let mut sibling = path.as_os_str().to_owned();
        sibling.push(suffix);
        targets.push(PathBuf::from(sibling));
    }

    for target in targets {
        match std::fs::remove_file(&target) {
            Ok(()) => debug!(path = ?target, "Removed store file"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}
