//! Encryption key management using the system keyring
//!
//! The secure store's SQLCipher key lives in the OS keychain, generated on
//! first use. Losing it makes the store unreadable, which the store handles
//! by recreating itself empty.

use keyring::Entry;
use rand::Rng;
use tracing::{info, warn};
use trainhub_common::SecureString;
use trainhub_domain::{Result, TrainHubError};

use crate::errors::InfraError;

pub const SERVICE_NAME: &str = "com.trainhub.app";
const KEY_NAME: &str = "secure_store_key";

/// Manages the secure store key in the system keyring
#[derive(Debug, Clone)]
pub struct KeyManager {
    service: String,
    account: String,
}

impl Default for KeyManager {
    fn default() -> Self {
        Self::new(SERVICE_NAME, KEY_NAME)
    }
}

impl KeyManager {
    pub fn new(service: impl Into<String>, account: impl Into<String>) -> Self {
        Self { service: service.into(), account: account.into() }
    }

    /// Existing key, or a freshly generated one stored for next time.
    ///
    /// # Errors
    /// `TrainHubError::Security` if the keyring cannot be read or written.
    pub fn get_or_create_key(&self) -> Result<SecureString> {
        let entry = self.entry()?;

        match entry.get_password() {
            Ok(key) => Ok(SecureString::from(key)),
            Err(keyring::Error::NoEntry) => {
                info!(service = %self.service, "No store key in keyring, generating one");
                let key = generate_key();
                entry.set_password(key.expose()).map_err(|e| TrainHubError::from(InfraError::from(e)))?;
                Ok(key)
            }
            Err(e) => {
                warn!(error = %e, "Keyring read failed");
                Err(TrainHubError::from(InfraError::from(e)))
            }
        }
    }

    /// Delete the stored key. The next open recreates the store.
    pub fn delete_key(&self) -> Result<()> {
        match self.entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(TrainHubError::from(InfraError::from(e))),
        }
    }

    fn entry(&self) -> Result<Entry> {
        Entry::new(&self.service, &self.account)
            .map_err(|e| TrainHubError::Security(format!("Failed to access keyring: {e}")))
    }
}

/// 32 random bytes, hex encoded.
fn generate_key() -> SecureString {
    let bytes: [u8; 32] = rand::thread_rng().gen();
    SecureString::from(hex::encode(bytes))
}
