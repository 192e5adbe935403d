//! Session persistence ports

pub mod memory;
pub mod ports;
