//! Reusable request configuration

use serde::{Deserialize, Serialize};

use super::{Header, Headers, HttpMethod, PathTemplate, RequestBuilder};

/// Named, reusable configuration applied to many requests.
///
/// A spec is a plain value: every `with_*` method returns a new spec, so a
/// spec can be cloned into concurrently running scenarios without sharing
/// mutable state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestSpec {
    /// Human-readable name used in logs and reports
    pub name: String,
    /// Scheme and authority, e.g. `https://reqres.in`
    pub base_uri: String,
    /// Path prefix applied to every resource path, e.g. `/api`
    #[serde(default)]
    pub base_path: String,
    /// Headers sent with every request built from this spec
    #[serde(default)]
    pub headers: Headers,
    /// Content type declared for request bodies
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

impl RequestSpec {
    /// Creates a spec targeting `base_uri` with no headers.
    #[must_use]
    pub fn new(name: impl Into<String>, base_uri: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_uri: base_uri.into(),
            base_path: String::new(),
            headers: Headers::new(),
            content_type: None,
        }
    }

    /// Returns a copy renamed to `name`.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Returns a copy with the given base path.
    #[must_use]
    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = base_path.into();
        self
    }

    /// Returns a copy with the header added (replacing a same-named one).
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(Header::new(name, value));
        self
    }

    /// Returns a copy declaring the body content type.
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Starts building a request against `template` with this spec applied.
    #[must_use]
    pub fn request<'a>(&'a self, method: HttpMethod, template: &'a PathTemplate) -> RequestBuilder<'a> {
        RequestBuilder::new(self, method, template)
    }
}
