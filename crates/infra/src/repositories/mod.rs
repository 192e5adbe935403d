//! Domain repositories
//!
//! Thin adapters over [`RequestOrchestrator::send`]: build the parameters,
//! describe the call, decode the envelope payload. State cells are only
//! updated after a successful response.
//!
//! [`RequestOrchestrator::send`]: crate::api::RequestOrchestrator::send

use std::borrow::Cow;

use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::error;
use trainhub_domain::{ResponseEnvelope, TrainHubError};

pub mod notifications;
pub mod session;
pub mod teams;
pub mod workouts;

pub use notifications::NotificationRepository;
pub use session::SessionRepository;
pub use teams::TeamRepository;
pub use workouts::WorkoutRepository;

/// Why a repository operation did not produce a value.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The backend (or the orchestrator) reported a failure. The user has
    /// already been shown feedback for it.
    #[error("request rejected with code {}: {}", .0.code, .0.message)]
    Rejected(ResponseEnvelope),

    /// The request succeeded but its payload or local persistence did not.
    #[error(transparent)]
    Domain(#[from] TrainHubError),
}

impl RepositoryError {
    /// The failure envelope, for `Rejected` only.
    pub fn envelope(&self) -> Option<&ResponseEnvelope> {
        match self {
            Self::Rejected(envelope) => Some(envelope),
            Self::Domain(_) => None,
        }
    }
}

/// Result of every repository operation.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

pub(crate) fn decode_item<T: DeserializeOwned>(
    envelope: &ResponseEnvelope,
    index: usize,
) -> RepositoryResult<T> {
    envelope.decode_item(index).map_err(|err| {
        error!(error = %err, index, "Malformed envelope payload");
        RepositoryError::Domain(err)
    })
}

pub(crate) fn decode_all<T: DeserializeOwned>(envelope: &ResponseEnvelope) -> RepositoryResult<Vec<T>> {
    envelope.decode_all().map_err(|err| {
        error!(error = %err, "Malformed envelope payload");
        RepositoryError::Domain(err)
    })
}

/// Percent-encode an id for use as one path segment.
pub(crate) fn segment(id: &str) -> Cow<'_, str> {
    urlencoding::encode(id)
}
