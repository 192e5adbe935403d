//! Storage primitives for encrypted databases
//!
//! SQLCipher connection pooling plus the self-healing open used by the
//! secure key-value store.

pub mod error;
pub mod sqlcipher;

// Re-export commonly used types
pub use error::{StorageError, StorageResult};
pub use sqlcipher::{
    apply_connection_pragmas, SqlCipherConfig, SqlCipherConnection, SqlCipherPool,
    SqlCipherPoolConfig,
};
