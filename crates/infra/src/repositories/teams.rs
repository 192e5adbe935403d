//! Team repository

use std::sync::Arc;

use tokio::sync::watch;
use tracing::info;
use trainhub_domain::{RequestParams, Team};

use super::{decode_all, decode_item, segment, RepositoryError, RepositoryResult};
use crate::api::{RequestOrchestrator, SendOptions};
use crate::http::ApiTransport;

/// Team listing and membership, plus the selected team.
pub struct TeamRepository {
    api: Arc<RequestOrchestrator>,
    selected: watch::Sender<Option<Team>>,
}

impl TeamRepository {
    /// No team is selected initially.
    pub fn new(api: Arc<RequestOrchestrator>) -> Self {
        let (selected, _) = watch::channel(None);
        Self { api, selected }
    }

    /// Team the user is currently looking at.
    pub fn selected(&self) -> watch::Receiver<Option<Team>> {
        self.selected.subscribe()
    }

    /// Set or clear the selection locally.
    pub fn select(&self, team: Option<Team>) {
        self.selected.send_replace(team);
    }

    /// Teams the user belongs to.
    ///
    /// # Errors
    /// `RepositoryError::Rejected` when the call fails, `RepositoryError::Domain`
    /// when a team does not decode.
    pub async fn list(&self) -> RepositoryResult<Vec<Team>> {
        let envelope = self
            .api
            .send(&|t: &ApiTransport| t.get("teams"), SendOptions::default())
            .await
            .map_err(RepositoryError::Rejected)?;

        decode_all(&envelope)
    }

    /// Join by invite code; the joined team becomes the selection.
    ///
    /// # Errors
    /// `RepositoryError::Rejected` for an unknown code or failed call,
    /// `RepositoryError::Domain` for a malformed reply. The selection is
    /// unchanged on error.
    pub async fn join(&self, code: &str) -> RepositoryResult<Team> {
        let params = RequestParams::new().with("code", code.trim());
        let envelope = self
            .api
            .send(&move |t: &ApiTransport| t.post("teams/join", &params), SendOptions::default())
            .await
            .map_err(RepositoryError::Rejected)?;

        let team: Team = decode_item(&envelope, 0)?;
        info!(team_id = %team.id, "Joined team");
        self.selected.send_replace(Some(team.clone()));
        Ok(team)
    }

    /// Leave a team; clears the selection if it was that team.
    ///
    /// # Errors
    /// `RepositoryError::Rejected` if the call fails.
    pub async fn leave(&self, team_id: &str) -> RepositoryResult<()> {
        let path = format!("teams/{}/leave", segment(team_id));
        let params = RequestParams::new();
        self.api
            .send(&move |t: &ApiTransport| t.post(&path, &params), SendOptions::default())
            .await
            .map_err(RepositoryError::Rejected)?;

        self.selected.send_if_modified(|selected| {
            if selected.as_ref().is_some_and(|team| team.id == team_id) {
                *selected = None;
                true
            } else {
                false
            }
        });
        Ok(())
    }
}
