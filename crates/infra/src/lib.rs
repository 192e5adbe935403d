//! # TrainHub Infrastructure
//!
//! Infrastructure implementations of the core ports.
//!
//! This crate contains:
//! - The HTTP transport factory and the request orchestrator
//! - The SQLCipher-backed secure store and its keyring key
//! - Connectivity state and configuration loading
//! - Domain repositories built on the orchestrator
//!
//! ## Architecture
//! - Implements traits defined in `trainhub-core`
//! - Contains all "impure" code (I/O, keychain, network)

pub mod api;
pub mod config;
pub mod errors;
pub mod http;
pub mod key_manager;
pub mod network;
pub mod repositories;
pub mod storage;

pub use api::{ApiError, RequestDescriptor, RequestOrchestrator, SendOptions};
pub use errors::InfraError;
pub use http::{ApiTransport, TransportFactory};
pub use key_manager::KeyManager;
pub use network::SharedConnectivity;
pub use repositories::{
    NotificationRepository, RepositoryError, RepositoryResult, SessionRepository, TeamRepository,
    WorkoutRepository,
};
pub use storage::SqlCipherSecureStore;
