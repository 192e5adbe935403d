//! # TrainHub App
//!
//! Application layer: wiring and entry point.
//!
//! This crate contains:
//! - Application context (dependency injection)
//! - Logging setup and the feedback listener
//!
//! ## Architecture
//! - Depends on `common`, `domain`, `core`, and `infra`
//! - Wires the ports to their infrastructure implementations

pub mod context;
pub mod utils;

pub use context::*;
