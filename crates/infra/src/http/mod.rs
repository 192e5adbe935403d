//! HTTP transport

pub mod transport;

pub use transport::{ApiTransport, TransportFactory};
