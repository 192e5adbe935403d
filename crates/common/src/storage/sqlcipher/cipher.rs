//! SQLCipher configuration
//!
//! Applies the encryption pragmas every connection needs before it touches a
//! page.

use rusqlite::Connection;
use tracing::{debug, error};

use crate::security::SecureString;
use crate::storage::error::{looks_like_wrong_key, StorageError, StorageResult};

/// SQLCipher configuration
#[derive(Clone)]
pub struct SqlCipherConfig {
    pub key: SecureString,
    /// Cipher compatibility version (4 for SQLCipher 4.x)
    pub cipher_compatibility: i32,
    pub kdf_iter: i32,
}

impl std::fmt::Debug for SqlCipherConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqlCipherConfig")
            .field("key", &self.key)
            .field("cipher_compatibility", &self.cipher_compatibility)
            .field("kdf_iter", &self.kdf_iter)
            .finish()
    }
}

impl SqlCipherConfig {
    pub fn new(key: SecureString) -> Self {
        Self { key, cipher_compatibility: 4, kdf_iter: 256_000 }
    }

    pub fn with_kdf_iter(mut self, iterations: i32) -> Self {
        self.kdf_iter = iterations;
        self
    }
}

/// Apply the key and cipher pragmas. Must run immediately after the
/// connection is opened.
pub fn configure_sqlcipher(conn: &Connection, config: &SqlCipherConfig) -> StorageResult<()> {
    conn.pragma_update(None, "key", config.key.expose()).map_err(|e| {
        error!(error = %e, "SQLCipher key setup failed");
        if looks_like_wrong_key(&e.to_string()) {
            StorageError::WrongKeyOrNotEncrypted
        } else {
            StorageError::Encryption(format!("Failed to set encryption key: {e}"))
        }
    })?;

    conn.pragma_update(None, "cipher_compatibility", config.cipher_compatibility).map_err(
        |e| StorageError::Encryption(format!("Failed to set cipher_compatibility: {e}")),
    )?;

    conn.pragma_update(None, "kdf_iter", config.kdf_iter)
        .map_err(|e| StorageError::Encryption(format!("Failed to set kdf_iter: {e}")))?;

    debug!("SQLCipher configured");
    Ok(())
}

/// Force SQLCipher to decrypt the header and schema pages.
///
/// # Errors
/// Returns `WrongKeyOrNotEncrypted` if the key does not open the file.
pub fn verify_encryption(conn: &Connection) -> StorageResult<()> {
    conn.query_row("SELECT count(*) FROM sqlite_master", [], |_| Ok(())).map_err(|e| {
        if looks_like_wrong_key(&e.to_string()) {
            error!(error = %e, "Encryption verification failed");
            StorageError::WrongKeyOrNotEncrypted
        } else {
            StorageError::from(e)
        }
    })
}
