//! Port interface for the secure key-value store
//!
//! The store holds the bearer token, the serialized current user and the
//! first-launch marker. Implementations provide raw `get`/`set`/`remove`;
//! the typed accessors are built on top of them.

use async_trait::async_trait;
use trainhub_domain::constants::{
    STORE_KEY_AUTH_TOKEN, STORE_KEY_FIRST_START, STORE_KEY_SERIALIZED_USER,
};
use trainhub_domain::{AuthToken, Result};

/// Tamper-resistant key-value storage
#[async_trait]
pub trait SecureStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> Result<()>;

    async fn remove(&self, key: &str) -> Result<()>;

    /// Stored bearer token, empty when absent.
    async fn get_token(&self) -> Result<AuthToken> {
        Ok(self.get(STORE_KEY_AUTH_TOKEN).await?.map(AuthToken::new).unwrap_or_default())
    }

    /// Persist the token. An empty token removes the entry.
    async fn set_token(&self, token: &AuthToken) -> Result<()> {
        if token.is_empty() {
            self.remove(STORE_KEY_AUTH_TOKEN).await
        } else {
            self.set(STORE_KEY_AUTH_TOKEN, token.expose()).await
        }
    }

    async fn get_user(&self) -> Result<Option<String>> {
        self.get(STORE_KEY_SERIALIZED_USER).await
    }

    async fn set_user(&self, serialized: Option<&str>) -> Result<()> {
        match serialized {
            Some(value) => self.set(STORE_KEY_SERIALIZED_USER, value).await,
            None => self.remove(STORE_KEY_SERIALIZED_USER).await,
        }
    }

    /// True until `mark_launched` has been called once.
    async fn is_first_launch(&self) -> Result<bool> {
        Ok(self.get(STORE_KEY_FIRST_START).await?.is_none())
    }

    async fn mark_launched(&self) -> Result<()> {
        self.set(STORE_KEY_FIRST_START, "false").await
    }
}
