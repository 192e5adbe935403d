//! Feedback events
//!
//! Ephemeral, fire-and-forget payloads for the UI side channels. Nothing here
//! is persisted; listeners that are not subscribed at emission time miss the
//! event.

use serde::{Deserialize, Serialize};

use crate::constants::{VIBRATION_ERROR_GAP_MS, VIBRATION_ERROR_PULSE_MS, VIBRATION_SHORT_MS};

/// Identifier of a message the UI layer localizes itself
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKey {
    NoInternet,
    UnexpectedError,
    NetworkProblem,
}

impl MessageKey {
    /// Stable resource identifier for the localization table.
    pub fn resource_id(self) -> &'static str {
        match self {
            Self::NoInternet => "error_no_internet",
            Self::UnexpectedError => "error_unexpected",
            Self::NetworkProblem => "error_network_problem",
        }
    }

    /// English fallback text.
    pub fn default_text(self) -> &'static str {
        match self {
            Self::NoInternet => "No internet connection",
            Self::UnexpectedError => "Something went wrong. Please try again",
            Self::NetworkProblem => "Network problem. Check your connection and try again",
        }
    }
}

/// Snackbar payload: a localized key or a raw server-supplied string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum SnackbarText {
    Localized(MessageKey),
    Raw(String),
}

impl SnackbarText {
    /// Text to show when no localization table is available.
    pub fn fallback_text(&self) -> &str {
        match self {
            Self::Localized(key) => key.default_text(),
            Self::Raw(text) => text,
        }
    }
}

/// Haptic pattern: alternating idle/active durations in milliseconds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VibrationPattern {
    pub timings_ms: Vec<u64>,
    /// Index to repeat from; `None` plays once.
    pub repeat_from: Option<usize>,
}

impl VibrationPattern {
    pub fn new(timings_ms: Vec<u64>, repeat_from: Option<usize>) -> Self {
        Self { timings_ms, repeat_from }
    }

    /// Single short buzz.
    pub fn short() -> Self {
        Self::new(vec![0, VIBRATION_SHORT_MS], None)
    }

    /// Double pulse used for failed requests.
    pub fn error() -> Self {
        Self::new(
            vec![0, VIBRATION_ERROR_PULSE_MS, VIBRATION_ERROR_GAP_MS, VIBRATION_ERROR_PULSE_MS],
            None,
        )
    }

    pub fn total_duration_ms(&self) -> u64 {
        self.timings_ms.iter().sum()
    }
}

/// Any event published on the feedback channels
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum FeedbackEvent {
    LoadingState { visible: bool },
    Snackbar { text: SnackbarText },
    Vibration { pattern: VibrationPattern },
}
