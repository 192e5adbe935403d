//! API-specific error types
//!
//! Failures of a single request attempt that never produced a usable HTTP
//! response. The orchestrator turns them into synthesized envelopes; they do
//! not leave `send`.

use thiserror::Error;
use trainhub_core::TransportFailureKind;

/// Failure of one request attempt
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Failed to read response body: {0}")]
    Decode(String),

    #[error("Failed to build request: {0}")]
    RequestBuild(String),

    #[error("Failed to rebuild transport: {0}")]
    TransportRebuild(String),
}

impl ApiError {
    /// Classify a `reqwest` error by what went wrong.
    pub fn from_reqwest(err: &reqwest::Error) -> Self {
        let message = err.to_string();
        if err.is_timeout() {
            Self::Timeout(message)
        } else if err.is_builder() {
            Self::RequestBuild(message)
        } else if err.is_decode() || err.is_body() {
            Self::Decode(message)
        } else {
            Self::Transport(message)
        }
    }

    /// The distinction surfaced to the user.
    pub fn failure_kind(&self) -> TransportFailureKind {
        match self {
            Self::Timeout(_) => TransportFailureKind::Timeout,
            _ => TransportFailureKind::Other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_timeouts_are_network_problems() {
        assert_eq!(ApiError::Timeout("t".into()).failure_kind(), TransportFailureKind::Timeout);
        for err in [
            ApiError::Transport("x".into()),
            ApiError::Decode("x".into()),
            ApiError::RequestBuild("x".into()),
            ApiError::TransportRebuild("x".into()),
        ] {
            assert_eq!(err.failure_kind(), TransportFailureKind::Other);
        }
    }

    #[test]
    fn invalid_url_is_a_build_error() {
        let err = reqwest::Client::new().get("http://exa mple.com/ bad").build().unwrap_err();
        assert!(matches!(ApiError::from_reqwest(&err), ApiError::RequestBuild(_)));
    }
}
