//! Received HTTP response type
//!
//! Contains the status code, headers, raw body and timing of a response.

use std::borrow::Cow;
use std::time::Duration;

use crate::request::Headers;

/// An HTTP response as captured from the transport.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: Headers,
    /// Raw response body.
    pub body: Vec<u8>,
    /// Time from sending the request to reading the full body.
    pub duration: Duration,
}

impl HttpResponse {
    /// Creates a new `HttpResponse` from raw response data.
    #[must_use]
    pub const fn new(status: u16, headers: Headers, body: Vec<u8>, duration: Duration) -> Self {
        Self {
            status,
            headers,
            body,
            duration,
        }
    }

    /// Gets a header value by name (case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    /// Returns the `Content-Type` header, if any.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    /// Returns true when no body bytes were received.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Vec::is_empty is not const in stable
    pub fn is_body_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Returns the body as text; invalid UTF-8 is replaced.
    #[must_use]
    pub fn body_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// Returns at most `max_chars` characters of the body, marking truncation.
    #[must_use]
    pub fn body_snippet(&self, max_chars: usize) -> String {
        let text = self.body_text();
        let mut chars = text.chars();
        let snippet: String = chars.by_ref().take(max_chars).collect();
        if chars.next().is_some() {
            format!("{snippet}...")
        } else {
            snippet
        }
    }

    /// Returns a human-readable duration string (e.g., "124 ms").
    #[must_use]
    pub fn duration_display(&self) -> String {
        let millis = self.duration.as_millis();
        if millis < 1000 {
            format!("{millis} ms")
        } else {
            format!("{:.2} s", self.duration.as_secs_f64())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::Header;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_response_headers_and_body() {
        let headers: Headers = [Header::new("Content-Type", "application/json; charset=utf-8")]
            .into_iter()
            .collect();
        let response = HttpResponse::new(200, headers, br#"{"page":2}"#.to_vec(), Duration::from_millis(40));

        assert_eq!(response.content_type(), Some("application/json; charset=utf-8"));
        assert_eq!(response.body_text(), r#"{"page":2}"#);
        assert!(!response.is_body_empty());
        assert_eq!(response.duration_display(), "40 ms");
    }

    #[test]
    fn test_empty_body() {
        let response = HttpResponse::new(204, Headers::new(), Vec::new(), Duration::ZERO);
        assert!(response.is_body_empty());

        let whitespace = HttpResponse::new(204, Headers::new(), b" \n".to_vec(), Duration::ZERO);
        assert!(!whitespace.is_body_empty());
    }

    #[test]
    fn test_body_snippet_respects_char_boundaries() {
        let response = HttpResponse::new(200, Headers::new(), "héllo wörld".as_bytes().to_vec(), Duration::ZERO);
        assert_eq!(response.body_snippet(5), "héllo...");
        assert_eq!(response.body_snippet(50), "héllo wörld");
    }

    #[test]
    fn test_duration_display_seconds() {
        let response = HttpResponse {
            duration: Duration::from_millis(1500),
            ..Default::default()
        };
        assert_eq!(response.duration_display(), "1.50 s");
    }
}
