//! HTTP request body types

use serde::{Deserialize, Serialize};

use crate::contract::JSON_CONTENT_TYPE;
use crate::error::{DomainError, DomainResult};

/// The kind of request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RequestBodyKind {
    /// No body
    #[default]
    None,
    /// Raw text body with its media type
    Raw {
        /// The content type (e.g., "application/json")
        content_type: String,
    },
}

/// HTTP request body with content and type information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RequestBody {
    /// The kind of body
    pub kind: RequestBodyKind,
    /// The body content as a string
    #[serde(default)]
    pub content: String,
}

impl RequestBody {
    /// Creates an empty body.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            kind: RequestBodyKind::None,
            content: String::new(),
        }
    }

    /// Creates a JSON body from already serialized content.
    #[must_use]
    pub fn json(content: impl Into<String>) -> Self {
        Self {
            kind: RequestBodyKind::Raw {
                content_type: JSON_CONTENT_TYPE.to_string(),
            },
            content: content.into(),
        }
    }

    /// Serializes `payload` into a JSON body.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidBody` if the payload cannot be serialized.
    pub fn json_of<T: Serialize + ?Sized>(payload: &T) -> DomainResult<Self> {
        serde_json::to_string(payload)
            .map(Self::json)
            .map_err(|e| DomainError::InvalidBody(e.to_string()))
    }

    /// Returns whether the body is absent.
    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self.kind, RequestBodyKind::None)
    }

    /// Returns the content type if applicable.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        match &self.kind {
            RequestBodyKind::None => None,
            RequestBodyKind::Raw { content_type } => Some(content_type),
        }
    }
}
