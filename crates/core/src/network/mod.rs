//! Network reachability ports

pub mod ports;
