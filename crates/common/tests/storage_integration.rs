//! Integration tests for the encrypted storage layer
//!
//! Covers the pool lifecycle the secure store depends on: create, reopen with
//! the same key, and recreate after the key is lost.

#![cfg(feature = "platform")]

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tempfile::TempDir;
use trainhub_common::storage::{SqlCipherPool, SqlCipherPoolConfig, StorageError};
use trainhub_common::SecureString;

// ============================================================================
// Helpers
// ============================================================================

fn test_key() -> SecureString {
    SecureString::from("0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef")
}

fn other_key() -> SecureString {
    SecureString::from("fedcba9876543210fedcba9876543210fedcba9876543210fedcba9876543210")
}

fn fast_config() -> SqlCipherPoolConfig {
    SqlCipherPoolConfig {
        connection_timeout: Duration::from_secs(1),
        kdf_iter: 4_000,
        ..SqlCipherPoolConfig::default()
    }
}

fn temp_db_path() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("secure.db");
    (temp_dir, db_path)
}

fn seed_kv(pool: &SqlCipherPool, key: &str, value: &str) {
    let conn = pool.get_sqlcipher_connection().unwrap();
    conn.execute("CREATE TABLE IF NOT EXISTS kv (key TEXT PRIMARY KEY, value TEXT)", []).unwrap();
    conn.execute(
        "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
        rusqlite::params![key, value],
    )
    .unwrap();
}

fn read_kv(pool: &SqlCipherPool, key: &str) -> Result<String, StorageError> {
    let conn = pool.get_sqlcipher_connection()?;
    conn.query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| row.get(0))
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

// ============================================================================
// Lifecycle
// ============================================================================

#[test]
fn reopen_with_same_key_keeps_data() {
    let (_dir, db_path) = temp_db_path();

    {
        let pool = SqlCipherPool::new(&db_path, test_key(), fast_config()).unwrap();
        seed_kv(&pool, "auth_token", "abc");
    }

    let pool = SqlCipherPool::new(&db_path, test_key(), fast_config()).unwrap();
    assert_eq!(read_kv(&pool, "auth_token").unwrap(), "abc");
}

#[test]
fn file_is_not_plaintext() {
    let (_dir, db_path) = temp_db_path();

    {
        let pool = SqlCipherPool::new(&db_path, test_key(), fast_config()).unwrap();
        seed_kv(&pool, "serialized_user", "plaintext-marker-value");
        let conn = pool.get_sqlcipher_connection().unwrap();
        conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);").unwrap();
    }

    let bytes = std::fs::read(&db_path).unwrap();
    let haystack = String::from_utf8_lossy(&bytes);
    assert!(!haystack.contains("plaintext-marker-value"));
    assert!(!bytes.starts_with(b"SQLite format 3"));
}

#[test]
fn lost_key_recreates_empty_store() {
    let (_dir, db_path) = temp_db_path();

    {
        let pool = SqlCipherPool::new(&db_path, test_key(), fast_config()).unwrap();
        seed_kv(&pool, "auth_token", "abc");
    }

    let pool = SqlCipherPool::open_or_recreate(&db_path, other_key(), fast_config()).unwrap();
    let conn = pool.get_sqlcipher_connection().unwrap();
    let tables: i64 = conn
        .query_row("SELECT count(*) FROM sqlite_master WHERE name = 'kv'", [], |row| row.get(0))
        .unwrap();
    assert_eq!(tables, 0);
    drop(conn);

    seed_kv(&pool, "auth_token", "fresh");
    assert_eq!(read_kv(&pool, "auth_token").unwrap(), "fresh");
}

#[test]
fn recreate_removes_stale_wal_files() {
    let (_dir, db_path) = temp_db_path();
    std::fs::write(&db_path, b"garbage garbage garbage garbage garbage garbage").unwrap();
    std::fs::write(sibling(&db_path, "-wal"), b"stale wal").unwrap();
    std::fs::write(sibling(&db_path, "-shm"), b"stale shm").unwrap();

    let pool = SqlCipherPool::open_or_recreate(&db_path, test_key(), fast_config()).unwrap();
    seed_kv(&pool, "first_start", "false");
    assert_eq!(read_kv(&pool, "first_start").unwrap(), "false");
}

#[test]
fn healthy_store_is_not_recreated() {
    let (_dir, db_path) = temp_db_path();

    {
        let pool = SqlCipherPool::new(&db_path, test_key(), fast_config()).unwrap();
        seed_kv(&pool, "auth_token", "keep-me");
    }

    let pool = SqlCipherPool::open_or_recreate(&db_path, test_key(), fast_config()).unwrap();
    assert_eq!(read_kv(&pool, "auth_token").unwrap(), "keep-me");
}

// ============================================================================
// Concurrency
// ============================================================================

#[test]
fn concurrent_writers_share_the_pool() {
    let (_dir, db_path) = temp_db_path();
    let pool = Arc::new(SqlCipherPool::new(&db_path, test_key(), fast_config()).unwrap());
    seed_kv(&pool, "seed", "0");

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let pool = Arc::clone(&pool);
            thread::spawn(move || seed_kv(&pool, &format!("key-{i}"), &i.to_string()))
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    for i in 0..4 {
        assert_eq!(read_kv(&pool, &format!("key-{i}")).unwrap(), i.to_string());
    }
}

#[test]
fn missing_row_reports_no_rows() {
    let (_dir, db_path) = temp_db_path();
    let pool = SqlCipherPool::new(&db_path, test_key(), fast_config()).unwrap();
    seed_kv(&pool, "present", "yes");

    let err = read_kv(&pool, "absent").unwrap_err();
    assert!(err.is_no_rows());
}
