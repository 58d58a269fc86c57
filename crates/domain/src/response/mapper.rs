//! Maps response bodies onto typed records.

use serde::de::DeserializeOwned;
use thiserror::Error;

use super::HttpResponse;

const SNIPPET_CHARS: usize = 200;

/// A response body could not be deserialized into the target record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot map response body to {target}: {reason} (body: {snippet})")]
pub struct MappingError {
    /// Name of the target record type.
    pub target: String,
    /// Deserializer message.
    pub reason: String,
    /// Leading part of the offending body.
    pub snippet: String,
}

/// Deserializes the body of `response` into `T`.
///
/// Unknown fields are ignored by the record types; missing `Option` fields
/// become `None`. Malformed JSON, type mismatches, missing required fields and
/// empty bodies all fail.
///
/// # Errors
///
/// Returns a `MappingError` naming the target type.
pub fn map_record<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, MappingError> {
    let target = short_type_name::<T>();
    if response.is_body_empty() {
        return Err(MappingError {
            target,
            reason: "empty body".to_string(),
            snippet: String::new(),
        });
    }
    serde_json::from_slice(&response.body).map_err(|e| MappingError {
        target,
        reason: e.to_string(),
        snippet: response.body_snippet(SNIPPET_CHARS),
    })
}

fn short_type_name<T>() -> String {
    let full = std::any::type_name::<T>();
    full.rsplit("::").next().unwrap_or(full).to_string()
}
