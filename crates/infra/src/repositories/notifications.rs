//! Notification repository

use std::sync::Arc;

use trainhub_domain::{Notification, RequestParams};

use super::{decode_all, segment, RepositoryError, RepositoryResult};
use crate::api::{RequestOrchestrator, SendOptions};
use crate::http::ApiTransport;

/// Notification inbox calls.
pub struct NotificationRepository {
    api: Arc<RequestOrchestrator>,
}

impl NotificationRepository {
    /// Stateless; nothing is cached.
    pub fn new(api: Arc<RequestOrchestrator>) -> Self {
        Self { api }
    }

    /// Fetched in the background, without the loading indicator.
    ///
    /// # Errors
    /// `RepositoryError::Rejected` when the call fails, `RepositoryError::Domain`
    /// when a notification does not decode.
    pub async fn list(&self) -> RepositoryResult<Vec<Notification>> {
        let envelope = self
            .api
            .send(&|t: &ApiTransport| t.get("notifications"), SendOptions::background())
            .await
            .map_err(RepositoryError::Rejected)?;

        decode_all(&envelope)
    }

    /// # Errors
    /// `RepositoryError::Rejected` if the call fails.
    pub async fn mark_read(&self, id: &str) -> RepositoryResult<()> {
        let path = format!("notifications/{}/read", segment(id));
        let params = RequestParams::new();
        self.api
            .send(&move |t: &ApiTransport| t.put(&path, &params), SendOptions::default())
            .await
            .map_err(RepositoryError::Rejected)?;
        Ok(())
    }
}
