//! Session repository
//!
//! Login, registration, profile updates and logout. Owns the pairing of
//! token and user: whenever both are known they are written to the secure
//! store and the transport is rebuilt with the token.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{info, warn};
use trainhub_core::SecureStore;
use trainhub_domain::{AuthToken, RequestParams, ResponseEnvelope, TrainHubError, User};

use super::{decode_item, RepositoryError, RepositoryResult};
use crate::api::{RequestOrchestrator, SendOptions};
use crate::http::ApiTransport;

/// Signs users in and out and keeps the stored session in step with the
/// transport.
pub struct SessionRepository {
    api: Arc<RequestOrchestrator>,
    store: Arc<dyn SecureStore>,
    current_user: watch::Sender<Option<User>>,
}

impl SessionRepository {
    /// Starts signed out; call [`restore`](Self::restore) to pick up a
    /// stored session.
    pub fn new(api: Arc<RequestOrchestrator>, store: Arc<dyn SecureStore>) -> Self {
        let (current_user, _) = watch::channel(None);
        Self { api, store, current_user }
    }

    /// The signed-in user, `None` when signed out.
    pub fn current_user(&self) -> watch::Receiver<Option<User>> {
        self.current_user.subscribe()
    }

    /// Whether a user is currently known.
    pub fn is_signed_in(&self) -> bool {
        self.current_user.borrow().is_some()
    }

    /// Rebuild the transport from the stored token and load the stored user.
    ///
    /// A stored user that no longer decodes is dropped.
    ///
    /// # Errors
    /// `RepositoryError::Domain` if the store cannot be read or the transport
    /// cannot be rebuilt.
    pub async fn restore(&self) -> RepositoryResult<Option<User>> {
        let token = self.store.get_token().await?;
        self.api.transports().rebuild(token)?;

        let user = match self.store.get_user().await? {
            Some(raw) => match serde_json::from_str::<User>(&raw) {
                Ok(user) => Some(user),
                Err(err) => {
                    warn!(error = %err, "Stored user is unreadable, discarding it");
                    self.store.set_user(None).await?;
                    None
                }
            },
            None => None,
        };

        info!(signed_in = user.is_some(), "Session restored");
        self.current_user.send_replace(user.clone());
        Ok(user)
    }

    /// Sign in with email and password.
    ///
    /// `data[0]` is the user, `data[1]` the token. Both are persisted and the
    /// transport switches to the new token.
    ///
    /// # Errors
    /// `RepositoryError::Rejected` with the failure envelope when the backend
    /// refuses, `RepositoryError::Domain` when the payload is malformed or
    /// lacks a token, or the store write fails.
    pub async fn login(&self, email: &str, password: &str) -> RepositoryResult<User> {
        let params = RequestParams::new().with("email", email).with("password", password);
        let envelope = self
            .api
            .send(&move |t: &ApiTransport| t.post("auth/login", &params), SendOptions::default())
            .await
            .map_err(RepositoryError::Rejected)?;

        self.establish(&envelope).await
    }

    /// Create an account and sign in with it. The response has the same
    /// shape as [`login`](Self::login).
    ///
    /// # Errors
    /// As for [`login`](Self::login).
    pub async fn register(&self, user: &User, password: &str) -> RepositoryResult<User> {
        let mut params = RequestParams::new().with("password", password);
        params.insert_json("user", user)?;
        let envelope = self
            .api
            .send(&move |t: &ApiTransport| t.post("auth/register", &params), SendOptions::default())
            .await
            .map_err(RepositoryError::Rejected)?;

        self.establish(&envelope).await
    }

    /// `data[0]` is the updated user; a `data[1]` token replaces the current
    /// one.
    ///
    /// # Errors
    /// `RepositoryError::Rejected` when the backend refuses the update,
    /// `RepositoryError::Domain` for a malformed payload or a failed store
    /// write.
    pub async fn update_profile(&self, user: &User) -> RepositoryResult<User> {
        let mut params = RequestParams::new();
        params.insert_json("user", user)?;
        let envelope = self
            .api
            .send(&move |t: &ApiTransport| t.put("users/me", &params), SendOptions::default())
            .await
            .map_err(RepositoryError::Rejected)?;

        let updated: User = decode_item(&envelope, 0)?;
        if let Some(token) = envelope.data.get(1).filter(|t| !t.is_empty()) {
            self.install_token(AuthToken::new(token.as_str())).await?;
        }
        self.persist_user(&updated).await?;
        Ok(updated)
    }

    /// Forget the token and user locally. No request is made.
    ///
    /// # Errors
    /// `RepositoryError::Domain` if the store cannot be cleared.
    pub async fn logout(&self) -> RepositoryResult<()> {
        self.install_token(AuthToken::empty()).await?;
        self.store.set_user(None).await?;
        self.current_user.send_replace(None);
        info!("Signed out");
        Ok(())
    }

    async fn establish(&self, envelope: &ResponseEnvelope) -> RepositoryResult<User> {
        let user: User = decode_item(envelope, 0)?;
        let token = match envelope.data.get(1).filter(|t| !t.is_empty()) {
            Some(token) => AuthToken::new(token.as_str()),
            None => {
                warn!(user_id = %user.id, "Authentication response carried no token");
                return Err(RepositoryError::Domain(TrainHubError::InvalidInput(
                    "authentication response carried no token".into(),
                )));
            }
        };

        self.install_token(token).await?;
        self.persist_user(&user).await?;
        info!(user_id = %user.id, "Signed in");
        Ok(user)
    }

    async fn install_token(&self, token: AuthToken) -> RepositoryResult<()> {
        self.store.set_token(&token).await?;
        self.api.transports().rebuild(token)?;
        Ok(())
    }

    async fn persist_user(&self, user: &User) -> RepositoryResult<()> {
        let serialized = serde_json::to_string(user).map_err(TrainHubError::from)?;
        self.store.set_user(Some(&serialized)).await?;
        self.current_user.send_replace(Some(user.clone()));
        Ok(())
    }
}
