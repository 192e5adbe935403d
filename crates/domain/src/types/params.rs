//! Request bodies
//!
//! Every endpoint takes a flat string-to-string map. Structured values are
//! serialized to JSON first and embedded as string values, so the backend
//! sees JSON inside JSON.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::Result;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestParams(BTreeMap<String, String>);

impl RequestParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert of a plain string value.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Serialize `value` to JSON and store the resulting string.
    pub fn insert_json<T: Serialize>(&mut self, key: impl Into<String>, value: &T) -> Result<()> {
        let encoded = serde_json::to_string(value)?;
        self.0.insert(key.into(), encoded);
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
