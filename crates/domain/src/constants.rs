//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! application.

// Envelope status codes
pub const CODE_UNPARSEABLE: i32 = 0;
pub const CODE_BAD_REQUEST: i32 = 400;
pub const CODE_UNAUTHORIZED: i32 = 401;

// Transport defaults
pub const DEFAULT_API_BASE_URL: &str = "https://api.trainhub.app/api/";
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_READ_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_WRITE_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MAX_CREDENTIAL_REFRESHES: u32 = 1;
pub const DEFAULT_USER_AGENT: &str = concat!("trainhub-client/", env!("CARGO_PKG_VERSION"));

// Secure store keys
pub const STORE_KEY_AUTH_TOKEN: &str = "auth_token";
pub const STORE_KEY_SERIALIZED_USER: &str = "serialized_user";
pub const STORE_KEY_FIRST_START: &str = "first_start";
pub const DEFAULT_STORE_FILE: &str = "trainhub-secure.db";

// Feedback channels
pub const FEEDBACK_CHANNEL_CAPACITY: usize = 64;
pub const VIBRATION_SHORT_MS: u64 = 150;
pub const VIBRATION_ERROR_PULSE_MS: u64 = 100;
pub const VIBRATION_ERROR_GAP_MS: u64 = 80;
