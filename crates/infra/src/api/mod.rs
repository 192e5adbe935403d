//! TrainHub API access
//!
//! Every backend call goes through [`RequestOrchestrator`]: connectivity
//! check, loading feedback, envelope classification, silent token refresh
//! and failure feedback. Call sites supply a [`RequestDescriptor`] and read
//! the resulting envelope.

pub mod descriptor;
pub mod errors;
pub mod orchestrator;

pub use descriptor::RequestDescriptor;
pub use errors::ApiError;
pub use orchestrator::{RequestOrchestrator, SendOptions};
