//! Secret handling
//!
//! Wrappers that keep key material out of logs and wipe it on drop.

pub mod secure_string;

pub use secure_string::SecureString;
