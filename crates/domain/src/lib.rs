//! # TrainHub Domain
//!
//! Business domain types and models for the TrainHub client.
//!
//! This crate contains:
//! - The wire envelope every backend response deserializes into
//! - Feedback events published to the UI side channels
//! - Passive DTOs (users, workouts, teams, notifications)
//! - Configuration structures and domain constants
//! - Domain error types and Result definitions
//!
//! ## Architecture
//! - No dependencies on other TrainHub crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
