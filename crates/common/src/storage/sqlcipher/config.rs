//! SQLCipher connection pool configuration

use std::time::Duration;

/// Pool settings for the encrypted store
#[derive(Debug, Clone)]
pub struct SqlCipherPoolConfig {
    pub max_size: u32,
    pub connection_timeout: Duration,
    /// Busy timeout for SQLite operations
    pub busy_timeout: Duration,
    pub enable_wal: bool,
    /// Key derivation iterations; lower only in tests.
    pub kdf_iter: i32,
}

impl Default for SqlCipherPoolConfig {
    fn default() -> Self {
        Self {
            max_size: 2,
            connection_timeout: Duration::from_secs(5),
            busy_timeout: Duration::from_millis(5000),
            enable_wal: true,
            kdf_iter: 256_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = SqlCipherPoolConfig::default();
        assert_eq!(config.max_size, 2);
        assert_eq!(config.connection_timeout, Duration::from_secs(5));
        assert_eq!(config.busy_timeout, Duration::from_millis(5000));
        assert!(config.enable_wal);
        assert_eq!(config.kdf_iter, 256_000);
    }
}
