//! UI feedback side channels
//!
//! Loading, snackbar and vibration events are broadcast on independent
//! channels. The orchestrator publishes; whatever renders them subscribes.

mod channels;

pub use channels::{FeedbackChannels, FeedbackSubscription, LoadingGuard};
