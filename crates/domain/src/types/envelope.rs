//! Response envelope
//!
//! Every backend response, success or failure, carries the same body shape:
//! `{ code, message, data[], notification }`. `data` elements are themselves
//! serialized JSON documents that only the caller knows how to interpret.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use crate::constants::{CODE_BAD_REQUEST, CODE_UNAUTHORIZED, CODE_UNPARSEABLE};
use crate::errors::{Result, TrainHubError};

/// Fixed-shape body of every backend response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    /// HTTP-style status duplicated in the body. `0` means the body could
    /// not be understood.
    #[serde(default, deserialize_with = "null_as_default")]
    pub code: i32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: Vec<String>,
    /// Server hint that the user has unread notifications.
    #[serde(default, deserialize_with = "null_as_default")]
    pub notification: bool,
}

/// Error bodies arrive either bare or nested under `value`, depending on
/// whether the backend produced them from a validation result or from a
/// thrown exception.
#[derive(Deserialize)]
#[serde(untagged)]
enum ErrorBody {
    Wrapped { value: ResponseEnvelope },
    Bare(ResponseEnvelope),
}

impl ResponseEnvelope {
    pub fn new(code: i32, message: impl Into<String>, data: Vec<String>) -> Self {
        Self { code, message: message.into(), data, notification: false }
    }

    /// Envelope synthesized for every failure whose body could not be used.
    pub fn unexpected() -> Self {
        Self::new(CODE_BAD_REQUEST, String::new(), Vec::new())
    }

    /// Synthesized failure envelope carrying a human-readable message.
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(CODE_BAD_REQUEST, message, Vec::new())
    }

    /// Parse a 2xx body. Empty or malformed bodies yield `None`.
    pub fn from_success_body(body: &[u8]) -> Option<Self> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return None;
        }
        serde_json::from_slice(body).ok()
    }

    /// Parse a non-2xx body in either of its two shapes.
    pub fn from_error_body(body: &[u8]) -> Option<Self> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return None;
        }
        match serde_json::from_slice::<ErrorBody>(body).ok()? {
            ErrorBody::Wrapped { value } | ErrorBody::Bare(value) => Some(value),
        }
    }

    pub fn is_unparseable(&self) -> bool {
        self.code == CODE_UNPARSEABLE
    }

    pub fn is_unauthorized(&self) -> bool {
        self.code == CODE_UNAUTHORIZED
    }

    /// The replacement token of a credential-expired response: a 401 that
    /// carries exactly one data element.
    pub fn replacement_token(&self) -> Option<&str> {
        match self.data.as_slice() {
            [token] if self.is_unauthorized() => Some(token.as_str()),
            _ => None,
        }
    }

    pub fn first_item(&self) -> Option<&str> {
        self.data.first().map(String::as_str)
    }

    /// Decode the JSON document stored at `data[index]`.
    pub fn decode_item<T: DeserializeOwned>(&self, index: usize) -> Result<T> {
        let raw = self.data.get(index).ok_or_else(|| {
            TrainHubError::InvalidInput(format!(
                "envelope has {} data elements, wanted index {index}",
                self.data.len()
            ))
        })?;
        Ok(serde_json::from_str(raw)?)
    }

    /// Decode every data element as `T`.
    pub fn decode_all<T: DeserializeOwned>(&self) -> Result<Vec<T>> {
        self.data.iter().map(|raw| serde_json::from_str(raw).map_err(Into::into)).collect()
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_success_body() {
        let body = br#"{"code":200,"message":"","data":["{\"id\":\"w1\"}"],"notification":true}"#;
        let envelope = ResponseEnvelope::from_success_body(body).unwrap();
        assert_eq!(envelope.code, 200);
        assert_eq!(envelope.data.len(), 1);
        assert!(envelope.notification);
    }

    #[test]
    fn empty_success_body_is_none() {
        assert!(ResponseEnvelope::from_success_body(b"").is_none());
        assert!(ResponseEnvelope::from_success_body(b"  \n").is_none());
    }

    #[test]
    fn error_body_bare_shape() {
        let body = br#"{"code":422,"message":"name required","data":[],"notification":false}"#;
        let envelope = ResponseEnvelope::from_error_body(body).unwrap();
        assert_eq!(envelope.code, 422);
        assert_eq!(envelope.message, "name required");
    }

    #[test]
    fn error_body_wrapped_shape() {
        let body = br#"{"value":{"code":409,"message":"already a member","data":[],"notification":false},"statusCode":409}"#;
        let envelope = ResponseEnvelope::from_error_body(body).unwrap();
        assert_eq!(envelope.code, 409);
        assert_eq!(envelope.message, "already a member");
    }

    #[test]
    fn null_fields_fall_back_to_defaults() {
        let body = br#"{"code":500,"message":null,"data":null}"#;
        let envelope = ResponseEnvelope::from_error_body(body).unwrap();
        assert_eq!(envelope.message, "");
        assert!(envelope.data.is_empty());
        assert!(!envelope.notification);
    }

    #[test]
    fn unrelated_json_object_parses_with_code_zero() {
        let envelope = ResponseEnvelope::from_error_body(br#"{"title":"Bad Request"}"#).unwrap();
        assert!(envelope.is_unparseable());
    }

    #[test]
    fn non_json_error_body_is_none() {
        assert!(ResponseEnvelope::from_error_body(b"<html>502</html>").is_none());
        assert!(ResponseEnvelope::from_error_body(br#""Unauthorized""#).is_none());
    }

    #[test]
    fn replacement_token_requires_single_element_401() {
        let single = ResponseEnvelope::new(401, "expired", vec!["tok".into()]);
        assert_eq!(single.replacement_token(), Some("tok"));

        let none = ResponseEnvelope::new(401, "expired", vec![]);
        assert_eq!(none.replacement_token(), None);

        let two = ResponseEnvelope::new(401, "expired", vec!["a".into(), "b".into()]);
        assert_eq!(two.replacement_token(), None);

        let not_auth = ResponseEnvelope::new(403, "forbidden", vec!["tok".into()]);
        assert_eq!(not_auth.replacement_token(), None);
    }

    #[test]
    fn decode_item_reads_nested_json() {
        #[derive(Deserialize)]
        struct Item {
            id: String,
        }

        let envelope = ResponseEnvelope::new(200, "", vec![r#"{"id":"abc"}"#.into()]);
        let item: Item = envelope.decode_item(0).unwrap();
        assert_eq!(item.id, "abc");
        assert!(envelope.decode_item::<Item>(1).is_err());
    }

    #[test]
    fn unexpected_envelope_uses_bad_request() {
        let envelope = ResponseEnvelope::unexpected();
        assert_eq!(envelope.code, CODE_BAD_REQUEST);
        assert!(envelope.message.is_empty());
        assert!(envelope.data.is_empty());
    }
}
