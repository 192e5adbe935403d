//! Startup helpers

pub mod feedback;
pub mod logging;

pub use feedback::{describe_event, spawn_feedback_logger};
pub use logging::{build_filter, init_logging};
