//! Request orchestrator
//!
//! Runs the per-request state machine:
//!
//! ```text
//! CheckingConnectivity ──offline──▶ failure (no-internet, short vibration)
//!        │
//!        ▼
//! AwaitingResponse ◀───────────────┐
//!        │                         │ rebuild transport, replay
//!        ├── 2xx + envelope ──▶ success
//!        ├── 401 + one token ──────┘ (at most `max_credential_refreshes` times)
//!        ├── other error body ──▶ failure (server message or generic)
//!        └── timeout / I/O ─────▶ failure (network problem or generic)
//! ```
//!
//! Loading is shown for each attempt when `block_ui` is set and hidden when
//! the attempt resolves, on every path. Failure feedback is one snackbar and
//! one vibration; a successful silent refresh produces neither.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, error, info, instrument, warn};
use trainhub_core::{
    classify_response, ConnectivityProbe, FeedbackChannels, ResponseOutcome, TerminalFailure,
};
use trainhub_domain::ResponseEnvelope;

use super::descriptor::RequestDescriptor;
use super::errors::ApiError;
use crate::http::{ApiTransport, TransportFactory};

/// Per-call options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SendOptions {
    /// Show the global loading indicator while the call is in flight.
    pub block_ui: bool,
}

impl Default for SendOptions {
    fn default() -> Self {
        Self { block_ui: true }
    }
}

impl SendOptions {
    /// Options for calls that run without the loading indicator.
    pub fn background() -> Self {
        Self { block_ui: false }
    }
}

/// Performs API calls on behalf of every repository.
pub struct RequestOrchestrator {
    transports: Arc<TransportFactory>,
    connectivity: Arc<dyn ConnectivityProbe>,
    feedback: FeedbackChannels,
    max_credential_refreshes: u32,
    unread_notifications: watch::Sender<bool>,
}

impl RequestOrchestrator {
    /// `max_credential_refreshes` caps how often one call may retry after the
    /// backend asks for new credentials. Zero disables retrying.
    ///
    /// Construction does no I/O and cannot fail. Transport build errors
    /// surface from [`TransportFactory::new`] and
    /// [`TransportFactory::rebuild`].
    pub fn new(
        transports: Arc<TransportFactory>,
        connectivity: Arc<dyn ConnectivityProbe>,
        feedback: FeedbackChannels,
        max_credential_refreshes: u32,
    ) -> Self {
        let (unread_notifications, _) = watch::channel(false);
        Self { transports, connectivity, feedback, max_credential_refreshes, unread_notifications }
    }

    /// Shared transport holder; repositories rebuild it when the token changes.
    pub fn transports(&self) -> &Arc<TransportFactory> {
        &self.transports
    }

    /// Channels the user-visible feedback is published on.
    pub fn feedback(&self) -> &FeedbackChannels {
        &self.feedback
    }

    /// Latest unread-notification hint from a successful response.
    pub fn unread_notifications(&self) -> watch::Receiver<bool> {
        self.unread_notifications.subscribe()
    }

    /// Perform the call and return its envelope.
    ///
    /// `Err` carries the failure envelope; failure feedback has already been
    /// published when this returns.
    ///
    /// # Errors
    /// Returns the failure envelope when the device is offline, the request
    /// fails in transport, the body does not parse, or the backend reports a
    /// non-success code.
    pub async fn send<D>(
        &self,
        descriptor: &D,
        options: SendOptions,
    ) -> Result<ResponseEnvelope, ResponseEnvelope>
    where
        D: RequestDescriptor + ?Sized,
    {
        self.send_with(descriptor, |_| {}, |_| {}, options).await
    }

    /// Perform the call, handing the envelope to `on_success` or
    /// `on_failure`. `on_failure` runs before the failure feedback is
    /// published. The envelope is also returned.
    ///
    /// # Errors
    /// As for [`send`](Self::send).
    pub async fn send_with<D, S, F>(
        &self,
        descriptor: &D,
        on_success: S,
        on_failure: F,
        options: SendOptions,
    ) -> Result<ResponseEnvelope, ResponseEnvelope>
    where
        D: RequestDescriptor + ?Sized,
        S: FnOnce(&ResponseEnvelope),
        F: FnOnce(&ResponseEnvelope),
    {
        match self.run(descriptor, options).await {
            Ok(envelope) => {
                on_success(&envelope);
                Ok(envelope)
            }
            Err(TerminalFailure { envelope, snackbar, vibration }) => {
                on_failure(&envelope);
                self.feedback.snackbar(snackbar);
                self.feedback.vibrate(vibration);
                Err(envelope)
            }
        }
    }

    async fn run<D>(
        &self,
        descriptor: &D,
        options: SendOptions,
    ) -> Result<ResponseEnvelope, TerminalFailure>
    where
        D: RequestDescriptor + ?Sized,
    {
        if !self.connectivity.is_online() {
            warn!("No active network transport, request not sent");
            return Err(TerminalFailure::no_internet());
        }

        let mut refreshes = 0u32;
        loop {
            let transport = self.transports.current();
            let outcome = {
                let _loading = options.block_ui.then(|| self.feedback.loading_guard());
                self.attempt(descriptor, &transport, refreshes + 1).await
            };

            match outcome {
                Ok(ResponseOutcome::Success(envelope)) => {
                    self.unread_notifications.send_replace(envelope.notification);
                    return Ok(envelope);
                }
                Ok(ResponseOutcome::CredentialExpired { token, envelope }) => {
                    if refreshes >= self.max_credential_refreshes {
                        warn!(refreshes, "Credential still rejected after refresh, giving up");
                        return Err(TerminalFailure::from_envelope(envelope));
                    }
                    refreshes += 1;

                    if let Err(err) = self.transports.rebuild(token) {
                        let err = ApiError::TransportRebuild(err.to_string());
                        error!(error = %err, "Cannot install refreshed credential");
                        return Err(TerminalFailure::from_transport(err.failure_kind()));
                    }
                    info!(refreshes, "Credential refreshed, replaying request");
                }
                Ok(ResponseOutcome::Failure(envelope)) => {
                    debug!(code = envelope.code, "Request failed");
                    return Err(TerminalFailure::from_envelope(envelope));
                }
                Err(err) => {
                    warn!(error = %err, "Request did not complete");
                    return Err(TerminalFailure::from_transport(err.failure_kind()));
                }
            }
        }
    }

    #[instrument(
        skip(self, descriptor, transport),
        fields(method = tracing::field::Empty, url = tracing::field::Empty)
    )]
    async fn attempt<D>(
        &self,
        descriptor: &D,
        transport: &ApiTransport,
        attempt: u32,
    ) -> Result<ResponseOutcome, ApiError>
    where
        D: RequestDescriptor + ?Sized,
    {
        let (client, request) = descriptor.build(transport).build_split();
        let request = request.map_err(|e| ApiError::RequestBuild(e.to_string()))?;

        let span = tracing::Span::current();
        span.record("method", tracing::field::display(request.method()));
        span.record("url", tracing::field::display(request.url()));
        debug!("Dispatching request");

        let response = client.execute(request).await.map_err(|e| ApiError::from_reqwest(&e))?;
        let status = response.status();
        let body = response.bytes().await.map_err(|e| ApiError::from_reqwest(&e))?;
        debug!(%status, bytes = body.len(), "Response received");

        Ok(classify_response(status.as_u16(), &body))
    }
}

impl std::fmt::Debug for RequestOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestOrchestrator")
            .field("base_url", &self.transports.base_url().as_str())
            .field("max_credential_refreshes", &self.max_credential_refreshes)
            .finish_non_exhaustive()
    }
}
