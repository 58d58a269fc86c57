//! Reusable response expectations
//!
//! A [`ResponseSpec`] is the response-side counterpart of a request spec:
//! a named bundle of what every response of a kind must satisfy before its
//! body is even looked at.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::HttpResponse;
use crate::contract::{STATUS_CREATED, STATUS_NOT_FOUND, STATUS_NO_CONTENT, STATUS_OK};

/// Expected status and content type for a response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseSpec {
    /// Human-readable name used in logs and reports
    pub name: String,
    /// Expected status code
    pub status: u16,
    /// Expected content type (substring match), if checked
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

/// Why a response does not satisfy its [`ResponseSpec`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResponseMismatch {
    /// The status code differs.
    #[error("expected status {expected}, got {actual}")]
    Status {
        /// Declared status.
        expected: u16,
        /// Received status.
        actual: u16,
    },
    /// The content type is missing or different.
    #[error("expected content type containing '{expected}', got {actual:?}")]
    ContentType {
        /// Declared content type.
        expected: String,
        /// Received content type.
        actual: Option<String>,
    },
}

impl ResponseSpec {
    /// Creates a spec expecting `status`.
    #[must_use]
    pub fn new(name: impl Into<String>, status: u16) -> Self {
        Self {
            name: name.into(),
            status,
            content_type: None,
        }
    }

    /// 200 OK.
    #[must_use]
    pub fn ok() -> Self {
        Self::new("ok", STATUS_OK)
    }

    /// 201 Created.
    #[must_use]
    pub fn created() -> Self {
        Self::new("created", STATUS_CREATED)
    }

    /// 204 No Content.
    #[must_use]
    pub fn no_content() -> Self {
        Self::new("no content", STATUS_NO_CONTENT)
    }

    /// 404 Not Found.
    #[must_use]
    pub fn not_found() -> Self {
        Self::new("not found", STATUS_NOT_FOUND)
    }

    /// Returns a copy that also checks the content type.
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Checks the status first, then the content type.
    ///
    /// # Errors
    ///
    /// Returns the first mismatch found.
    pub fn verify(&self, response: &HttpResponse) -> Result<(), ResponseMismatch> {
        if response.status != self.status {
            return Err(ResponseMismatch::Status {
                expected: self.status,
                actual: response.status,
            });
        }
        if let Some(expected) = &self.content_type {
            let actual = response.content_type();
            if !actual.is_some_and(|ct| ct.contains(expected.as_str())) {
                return Err(ResponseMismatch::ContentType {
                    expected: expected.clone(),
                    actual: actual.map(str::to_string),
                });
            }
        }
        Ok(())
    }
}
