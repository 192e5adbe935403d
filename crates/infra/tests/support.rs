//! Shared harness for orchestrator and repository tests

#![allow(dead_code)]

use std::sync::Arc;

use trainhub_core::{FeedbackChannels, FeedbackSubscription, NetworkTransports};
use trainhub_domain::{ApiConfig, AuthToken};
use trainhub_infra::{RequestOrchestrator, SharedConnectivity, TransportFactory};
use wiremock::MockServer;

/// Orchestrator wired to a wiremock backend, with a feedback subscription
/// opened before any request runs.
pub struct Harness {
    pub server: MockServer,
    pub connectivity: Arc<SharedConnectivity>,
    pub transports: Arc<TransportFactory>,
    pub api: Arc<RequestOrchestrator>,
    pub events: FeedbackSubscription,
}

impl Harness {
    pub async fn start() -> Self {
        Self::start_with(AuthToken::new("stale"), |_| {}).await
    }

    pub async fn start_with(token: AuthToken, tweak: impl FnOnce(&mut ApiConfig)) -> Self {
        let server = MockServer::start().await;
        let mut config = ApiConfig { base_url: format!("{}/api/", server.uri()), ..ApiConfig::default() };
        tweak(&mut config);

        let connectivity = Arc::new(SharedConnectivity::new(NetworkTransports {
            wifi: true,
            cellular: false,
        }));
        let transports = Arc::new(TransportFactory::new(&config, token).unwrap());
        let feedback = FeedbackChannels::default();
        let events = feedback.subscribe();
        let api = Arc::new(RequestOrchestrator::new(
            Arc::clone(&transports),
            connectivity.clone(),
            feedback,
            config.max_credential_refreshes,
        ));

        Self { server, connectivity, transports, api, events }
    }

    /// Number of loading-shown and loading-hidden events so far.
    pub fn loading_counts(&mut self) -> (usize, usize) {
        let events = self.events.drain_loading();
        let shown = events.iter().filter(|v| **v).count();
        (shown, events.len() - shown)
    }
}

pub fn envelope(code: i32, message: &str, data: &[&str], notification: bool) -> serde_json::Value {
    serde_json::json!({
        "code": code,
        "message": message,
        "data": data,
        "notification": notification,
    })
}
