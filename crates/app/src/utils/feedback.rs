//! Headless stand-in for the UI feedback surfaces
//!
//! Logs every loading, snackbar and vibration event the orchestrator
//! publishes, so the command-line client shows what a screen would.

use tokio::task::JoinHandle;
use tracing::{debug, info};
use trainhub_core::FeedbackSubscription;
use trainhub_domain::{FeedbackEvent, SnackbarText};

/// One-line rendering of an event, localized messages in their default
/// language.
pub fn describe_event(event: &FeedbackEvent) -> String {
    match event {
        FeedbackEvent::LoadingState { visible: true } => "loading shown".to_string(),
        FeedbackEvent::LoadingState { visible: false } => "loading hidden".to_string(),
        FeedbackEvent::Snackbar { text: SnackbarText::Localized(key) } => {
            format!("snackbar [{}] {}", key.resource_id(), key.default_text())
        }
        FeedbackEvent::Snackbar { text: SnackbarText::Raw(message) } => {
            format!("snackbar {message}")
        }
        FeedbackEvent::Vibration { pattern } => {
            format!("vibration {}ms", pattern.total_duration_ms())
        }
    }
}

/// Drain `subscription` into the log until the channels close.
pub fn spawn_feedback_logger(mut subscription: FeedbackSubscription) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = subscription.recv().await {
            match &event {
                FeedbackEvent::Snackbar { .. } => info!(target: "trainhub::feedback", "{}", describe_event(&event)),
                _ => debug!(target: "trainhub::feedback", "{}", describe_event(&event)),
            }
        }
        debug!(target: "trainhub::feedback", "Feedback channels closed");
    })
}
