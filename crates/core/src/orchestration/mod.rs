//! Request orchestration decisions
//!
//! Pure functions that turn a finished HTTP exchange into the next step of
//! the request state machine. The I/O half lives in
//! `trainhub-infra::api::orchestrator`.

mod outcome;

pub use outcome::{
    classify_response, classify_transport_failure, ResponseOutcome, TerminalFailure,
    TransportFailureKind,
};
