//! Network reachability

pub mod connectivity;

pub use connectivity::SharedConnectivity;
