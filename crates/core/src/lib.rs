//! # TrainHub Core
//!
//! Business logic layer with no infrastructure dependencies.
//!
//! This crate contains:
//! - Port interfaces (traits) implemented by `trainhub-infra`
//! - The feedback side channels the request orchestrator publishes to
//! - Response classification, the decision half of the request state machine
//!
//! ## Architecture Principles
//! - Only depends on `trainhub-domain`
//! - No database, HTTP, or platform code
//! - All external dependencies via traits

pub mod feedback;
pub mod network;
pub mod orchestration;
pub mod session;

pub use feedback::{FeedbackChannels, FeedbackSubscription, LoadingGuard};
pub use network::ports::{ConnectivityProbe, NetworkTransports};
pub use orchestration::{
    classify_response, classify_transport_failure, ResponseOutcome, TerminalFailure,
    TransportFailureKind,
};
pub use session::memory::MemorySecureStore;
pub use session::ports::SecureStore;
