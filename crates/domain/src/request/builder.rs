//! Request builder and the resolved request descriptor.

use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

use super::{
    Header, Headers, HttpMethod, PathParams, PathTemplate, QueryParam, QueryParams, RequestBody,
    RequestSpec,
};
use crate::error::{DomainError, DomainResult};

/// A fully resolved request, ready to hand to an HTTP client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedRequest {
    /// HTTP method
    pub method: HttpMethod,
    /// Absolute URL including the query string
    pub url: Url,
    /// Merged headers, including `Content-Type` when a body is present
    pub headers: Headers,
    /// Serialized body
    #[serde(default)]
    pub body: RequestBody,
}

impl ResolvedRequest {
    /// Returns a one-line description such as `GET https://reqres.in/api/users/2`.
    #[must_use]
    pub fn describe(&self) -> String {
        format!("{} {}", self.method, self.url)
    }
}

impl fmt::Display for ResolvedRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.url)
    }
}

/// Composes a [`ResolvedRequest`] from a [`RequestSpec`] and per-call parts.
///
/// Nothing is validated until [`RequestBuilder::build`], which fails fast on
/// configuration problems.
#[derive(Debug, Clone)]
pub struct RequestBuilder<'a> {
    spec: &'a RequestSpec,
    method: HttpMethod,
    template: &'a PathTemplate,
    path_params: PathParams,
    query: QueryParams,
    headers: Headers,
    body: RequestBody,
}

impl<'a> RequestBuilder<'a> {
    /// Creates a builder; usually reached through [`RequestSpec::request`].
    #[must_use]
    pub fn new(spec: &'a RequestSpec, method: HttpMethod, template: &'a PathTemplate) -> Self {
        Self {
            spec,
            method,
            template,
            path_params: PathParams::new(),
            query: QueryParams::new(),
            headers: Headers::new(),
            body: RequestBody::none(),
        }
    }

    /// Sets the value of a path placeholder.
    #[must_use]
    pub fn path_param(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.path_params.insert(name.into(), value.to_string());
        self
    }

    /// Appends a query parameter.
    #[must_use]
    pub fn query_param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.add(QueryParam::new(key, value.to_string()));
        self
    }

    /// Adds a per-call header; it overrides a same-named spec header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(Header::new(name, value));
        self
    }

    /// Sets a pre-built body.
    #[must_use]
    pub fn body(mut self, body: RequestBody) -> Self {
        self.body = body;
        self
    }

    /// Serializes `payload` as the JSON body.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidBody` if serialization fails.
    pub fn json_body<T: Serialize + ?Sized>(mut self, payload: &T) -> DomainResult<Self> {
        self.body = RequestBody::json_of(payload)?;
        Ok(self)
    }

    /// Resolves the template, URL, headers and body.
    ///
    /// # Errors
    ///
    /// Returns a `DomainError` for unresolved or unused path parameters,
    /// invalid header names, or a URL that does not parse as http(s).
    pub fn build(self) -> DomainResult<ResolvedRequest> {
        let path = self.template.resolve(&self.path_params)?;
        let joined = join_url(&self.spec.base_uri, &self.spec.base_path, &path);
        let mut url =
            Url::parse(&joined).map_err(|e| DomainError::InvalidUrl(format!("{e}: {joined}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(DomainError::InvalidUrl(format!(
                "URL must use http or https: {joined}"
            )));
        }

        if !self.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for param in self.query.iter() {
                pairs.append_pair(&param.key, &param.value);
            }
        }

        let mut headers = self.spec.headers.merged_with(&self.headers);
        for header in headers.iter() {
            header.validate()?;
        }

        if !self.body.is_none() && !headers.contains("content-type") {
            let content_type = self
                .spec
                .content_type
                .as_deref()
                .or_else(|| self.body.content_type());
            if let Some(content_type) = content_type {
                headers.insert(Header::new("Content-Type", content_type));
            }
        }

        Ok(ResolvedRequest {
            method: self.method,
            url,
            headers,
            body: self.body,
        })
    }
}

/// Joins base URI, base path and resource path with single slashes.
///
/// A trailing slash on the resource path is significant and kept.
fn join_url(base_uri: &str, base_path: &str, path: &str) -> String {
    let mut url = base_uri.trim_end_matches('/').to_string();
    for part in [base_path, path] {
        let part = part.trim_start_matches('/');
        if part.is_empty() {
            continue;
        }
        let kept = url.trim_end_matches('/').len();
        url.truncate(kept);
        url.push('/');
        url.push_str(part);
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;

    fn spec() -> RequestSpec {
        RequestSpec::new("test", "https://reqres.in").with_base_path("/api")
    }

    #[test]
    fn test_join_url() {
        assert_eq!(
            join_url("https://reqres.in", "/api", "/users/2"),
            "https://reqres.in/api/users/2"
        );
        assert_eq!(
            join_url("https://reqres.in/", "/api/", "/users/"),
            "https://reqres.in/api/users/"
        );
        assert_eq!(join_url("http://127.0.0.1:8080", "", "/users/"), "http://127.0.0.1:8080/users/");
    }

    #[test]
    fn test_build_list_request_with_query() {
        let spec = spec();
        let template = PathTemplate::parse("/users/").expect("valid template");
        let request = spec
            .request(HttpMethod::Get, &template)
            .query_param("page", 2)
            .build()
            .expect("buildable");

        assert_eq!(request.url.as_str(), "https://reqres.in/api/users/?page=2");
        assert!(request.headers.is_empty());
        assert!(request.body.is_none());
        assert_eq!(request.describe(), "GET https://reqres.in/api/users/?page=2");
    }

    #[test]
    fn test_build_substitutes_path_param() {
        let spec = spec().with_header("x-api-key", "reqres-free-v1");
        let template = PathTemplate::parse("/users/{id}").expect("valid template");
        let request = spec
            .request(HttpMethod::Delete, &template)
            .path_param("id", 2)
            .build()
            .expect("buildable");

        assert_eq!(request.url.as_str(), "https://reqres.in/api/users/2");
        assert_eq!(request.headers.get("x-api-key"), Some("reqres-free-v1"));
    }

    #[test]
    fn test_missing_path_param_is_configuration_error() {
        let spec = spec();
        let template = PathTemplate::parse("/users/{id}").expect("valid template");
        let result = spec.request(HttpMethod::Get, &template).build();
        assert!(matches!(
            result,
            Err(DomainError::UnresolvedPlaceholder { name, .. }) if name == "id"
        ));
    }

    #[test]
    fn test_json_body_sets_content_type_from_spec() {
        let spec = spec().with_content_type("application/json; charset=utf-8");
        let template = PathTemplate::parse("/users/").expect("valid template");
        let mut payload = BTreeMap::new();
        payload.insert("name", "morpheus");

        let request = spec
            .request(HttpMethod::Post, &template)
            .json_body(&payload)
            .expect("serializable")
            .build()
            .expect("buildable");

        assert_eq!(request.body.content, r#"{"name":"morpheus"}"#);
        assert_eq!(
            request.headers.get("content-type"),
            Some("application/json; charset=utf-8")
        );
    }

    #[test]
    fn test_content_type_only_with_body() {
        let spec = spec().with_content_type("application/json");
        let template = PathTemplate::parse("/users/{id}").expect("valid template");
        let request = spec
            .request(HttpMethod::Get, &template)
            .path_param("id", 2)
            .build()
            .expect("buildable");
        assert!(!request.headers.contains("content-type"));
    }

    #[test]
    fn test_call_headers_override_spec_headers() {
        let spec = spec().with_header("x-api-key", "from-spec");
        let template = PathTemplate::parse("/users/").expect("valid template");
        let request = spec
            .request(HttpMethod::Get, &template)
            .header("X-API-KEY", "from-call")
            .build()
            .expect("buildable");

        assert_eq!(request.headers.len(), 1);
        assert_eq!(request.headers.get("x-api-key"), Some("from-call"));
    }

    #[test]
    fn test_invalid_header_name_rejected() {
        let spec = spec();
        let template = PathTemplate::parse("/users/").expect("valid template");
        let result = spec
            .request(HttpMethod::Get, &template)
            .header("bad header", "x")
            .build();
        assert_eq!(
            result,
            Err(DomainError::InvalidHeaderName("bad header".to_string()))
        );
    }

    #[test]
    fn test_non_http_base_uri_rejected() {
        let spec = RequestSpec::new("ftp", "ftp://example.com");
        let template = PathTemplate::parse("/users/").expect("valid template");
        let result = spec.request(HttpMethod::Get, &template).build();
        assert!(matches!(result, Err(DomainError::InvalidUrl(_))));
    }
}
