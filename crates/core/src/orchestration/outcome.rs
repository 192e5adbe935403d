use tracing::debug;
use trainhub_domain::{AuthToken, MessageKey, ResponseEnvelope, SnackbarText, VibrationPattern};

/// Where one attempt of a request ends up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseOutcome {
    /// 2xx with a parseable envelope.
    Success(ResponseEnvelope),
    /// 401 carrying exactly one replacement token; replay with it.
    CredentialExpired { token: AuthToken, envelope: ResponseEnvelope },
    /// Anything else. The envelope is what the caller's failure path sees.
    Failure(ResponseEnvelope),
}

/// Transport errors, reduced to the distinction the user sees
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportFailureKind {
    Timeout,
    Other,
}

/// Classify a completed HTTP exchange.
///
/// Non-2xx bodies are parsed in both of their shapes (bare or nested under
/// `value`). Bodies that fail to parse, or parse with code `0`, collapse to
/// `ResponseEnvelope::unexpected()`. A 2xx without a usable body is the same
/// unexpected failure.
pub fn classify_response(status: u16, body: &[u8]) -> ResponseOutcome {
    if (200..300).contains(&status) {
        return match ResponseEnvelope::from_success_body(body) {
            Some(envelope) => ResponseOutcome::Success(envelope),
            None => {
                debug!(status, "Success status without a usable envelope");
                ResponseOutcome::Failure(ResponseEnvelope::unexpected())
            }
        };
    }

    let envelope = match ResponseEnvelope::from_error_body(body) {
        Some(envelope) if !envelope.is_unparseable() => envelope,
        _ => {
            debug!(status, "Unparseable error body");
            return ResponseOutcome::Failure(ResponseEnvelope::unexpected());
        }
    };

    match envelope.replacement_token().filter(|token| !token.is_empty()) {
        Some(token) => {
            let token = AuthToken::new(token);
            ResponseOutcome::CredentialExpired { token, envelope }
        }
        None => ResponseOutcome::Failure(envelope),
    }
}

/// Envelope synthesized for a request that never produced a response.
pub fn classify_transport_failure(kind: TransportFailureKind) -> ResponseEnvelope {
    match kind {
        TransportFailureKind::Timeout => {
            ResponseEnvelope::failure(MessageKey::NetworkProblem.default_text())
        }
        TransportFailureKind::Other => ResponseEnvelope::unexpected(),
    }
}

/// A terminal failure together with the feedback it produces
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminalFailure {
    pub envelope: ResponseEnvelope,
    pub snackbar: SnackbarText,
    pub vibration: VibrationPattern,
}

impl TerminalFailure {
    /// Generic application error: the server message if there is one,
    /// otherwise the localized unexpected-error text.
    pub fn from_envelope(envelope: ResponseEnvelope) -> Self {
        let snackbar = if envelope.message.is_empty() {
            SnackbarText::Localized(MessageKey::UnexpectedError)
        } else {
            SnackbarText::Raw(envelope.message.clone())
        };
        Self { envelope, snackbar, vibration: VibrationPattern::error() }
    }

    /// Failure reported before any request is made.
    pub fn no_internet() -> Self {
        Self {
            envelope: ResponseEnvelope::unexpected(),
            snackbar: SnackbarText::Localized(MessageKey::NoInternet),
            vibration: VibrationPattern::short(),
        }
    }

    pub fn from_transport(kind: TransportFailureKind) -> Self {
        let envelope = classify_transport_failure(kind);
        match kind {
            TransportFailureKind::Timeout => Self {
                envelope,
                snackbar: SnackbarText::Localized(MessageKey::NetworkProblem),
                vibration: VibrationPattern::error(),
            },
            TransportFailureKind::Other => Self::from_envelope(envelope),
        }
    }
}
