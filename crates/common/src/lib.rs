//! Common platform primitives shared across TrainHub crates.
//!
//! # Feature Tiers
//!
//! Enable cargo features to opt into the tiers you need:
//! - `foundation`: secret handling without any I/O
//! - `observability`: tracing instrumentation for the tiers below
//! - `platform`: encrypted SQLCipher storage

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

// Foundation tier
// -----------------------------------------------------------------
#[cfg(feature = "foundation")]
pub mod security;

// Platform tier
// -------------------------------------------------------------------
#[cfg(feature = "platform")]
pub mod storage;

#[cfg(feature = "foundation")]
pub use security::SecureString;
#[cfg(feature = "platform")]
pub use storage::{SqlCipherPool, SqlCipherPoolConfig, StorageError, StorageResult};
