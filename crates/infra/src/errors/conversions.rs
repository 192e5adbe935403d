//! Conversions from external infrastructure errors into domain errors.

use keyring::Error as KeyringError;
use reqwest::Error as HttpError;
use rusqlite::Error as SqlError;
use trainhub_common::StorageError;
use trainhub_domain::TrainHubError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub TrainHubError);

impl From<InfraError> for TrainHubError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<TrainHubError> for InfraError {
    fn from(value: TrainHubError) -> Self {
        InfraError(value)
    }
}

trait IntoTrainHubError {
    fn into_trainhub(self) -> TrainHubError;
}

/* -------------------------------------------------------------------------- */
/* rusqlite::Error → TrainHubError */
/* -------------------------------------------------------------------------- */

impl IntoTrainHubError for SqlError {
    fn into_trainhub(self) -> TrainHubError {
        use rusqlite::ffi::ErrorCode;
        use rusqlite::Error as RE;

        fn looks_like_wrong_key(message: &str) -> bool {
            let lower = message.to_ascii_lowercase();
            lower.contains("not a database") || lower.contains("encrypted")
        }

        match self {
            RE::SqliteFailure(err, maybe_message) => {
                let message = maybe_message.unwrap_or_default();
                match err.code {
                    ErrorCode::DatabaseBusy => TrainHubError::Database("database is busy".into()),
                    ErrorCode::DatabaseLocked => {
                        TrainHubError::Database("database is locked".into())
                    }
                    _ if looks_like_wrong_key(&message) => TrainHubError::Security(
                        "SQLCipher key rejected or database not encrypted".into(),
                    ),
                    _ => TrainHubError::Database(format!(
                        "sqlite failure {:?} (code {}): {}",
                        err.code, err.extended_code, message
                    )),
                }
            }
            RE::QueryReturnedNoRows => TrainHubError::NotFound("no rows returned by query".into()),
            RE::FromSqlConversionFailure(_, _, cause) => {
                TrainHubError::Database(format!("failed to convert sqlite value: {cause}"))
            }
            other => TrainHubError::Database(other.to_string()),
        }
    }
}

impl From<SqlError> for InfraError {
    fn from(value: SqlError) -> Self {
        InfraError(value.into_trainhub())
    }
}

/* -------------------------------------------------------------------------- */
/* StorageError → TrainHubError */
/* -------------------------------------------------------------------------- */

impl IntoTrainHubError for StorageError {
    fn into_trainhub(self) -> TrainHubError {
        match self {
            StorageError::Rusqlite(err) => err.into_trainhub(),
            StorageError::WrongKeyOrNotEncrypted => TrainHubError::Security(
                "secure store key rejected or database not encrypted".into(),
            ),
            StorageError::Encryption(msg) => TrainHubError::Security(msg),
            StorageError::Timeout(secs) => {
                TrainHubError::Database(format!("secure store busy for {secs}s"))
            }
            StorageError::InvalidConfig(msg) => TrainHubError::Config(msg),
            other => TrainHubError::Database(other.to_string()),
        }
    }
}

impl From<StorageError> for InfraError {
    fn from(value: StorageError) -> Self {
        InfraError(value.into_trainhub())
    }
}

/* -------------------------------------------------------------------------- */
/* keyring::Error → TrainHubError */
/* -------------------------------------------------------------------------- */

impl IntoTrainHubError for KeyringError {
    fn into_trainhub(self) -> TrainHubError {
        let description = self.to_string();

        match self {
            KeyringError::NoEntry => TrainHubError::NotFound("keychain entry not found".into()),
            KeyringError::BadEncoding(_) => {
                TrainHubError::Security("credential in keychain is not valid UTF-8".into())
            }
            KeyringError::PlatformFailure(err) => {
                TrainHubError::Security(format!("keychain platform error: {err}"))
            }
            KeyringError::NoStorageAccess(err) => {
                TrainHubError::Security(format!("unable to access secure storage: {err}"))
            }
            _ => TrainHubError::Security(description),
        }
    }
}

impl From<KeyringError> for InfraError {
    fn from(value: KeyringError) -> Self {
        InfraError(value.into_trainhub())
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → TrainHubError */
/* -------------------------------------------------------------------------- */

impl IntoTrainHubError for HttpError {
    fn into_trainhub(self) -> TrainHubError {
        if self.is_timeout() {
            return TrainHubError::Network("HTTP request timed out".into());
        }

        if self.is_connect() {
            return TrainHubError::Network("HTTP connection failure".into());
        }

        if self.is_builder() {
            return TrainHubError::Internal(format!("failed to build HTTP client: {self}"));
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            let message =
                format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));

            return match code {
                401 | 403 => TrainHubError::Auth(message),
                404 => TrainHubError::NotFound(message),
                400..=499 => TrainHubError::InvalidInput(message),
                _ => TrainHubError::Network(message),
            };
        }

        TrainHubError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_trainhub())
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json::Error → TrainHubError */
/* -------------------------------------------------------------------------- */

impl From<serde_json::Error> for InfraError {
    fn from(value: serde_json::Error) -> Self {
        InfraError(value.into())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
