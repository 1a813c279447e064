//! Shape validation for raw response bodies

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{PlayerError, Result};

/// Decode a response body into `T`, failing with [`PlayerError::Shape`]
/// when a required field is missing or has the wrong type.
pub fn decode<T: DeserializeOwned>(endpoint: &'static str, body: Value) -> Result<T> {
    serde_json::from_value(body).map_err(|source| {
        tracing::warn!(endpoint, error = %source, "Response did not match expected shape");
        PlayerError::Shape { endpoint, source }
    })
}

/// Like [`decode`], but an empty body is itself a shape error.
pub fn decode_required<T: DeserializeOwned>(endpoint: &'static str, body: Option<Value>) -> Result<T> {
    decode(endpoint, body.unwrap_or(Value::Null))
}
