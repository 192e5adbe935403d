//! Local encrypted persistence

pub mod secure_store;

pub use secure_store::SqlCipherSecureStore;
