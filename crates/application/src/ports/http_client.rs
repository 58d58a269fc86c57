//! HTTP Client port

use std::future::Future;

use reqres_domain::{HttpResponse, ResolvedRequest};
use thiserror::Error;

/// Port for executing HTTP requests.
///
/// This trait abstracts the HTTP client implementation, allowing
/// the application layer to be independent of specific HTTP libraries.
/// Implementations must be safe to share across scenarios behind an `Arc`.
pub trait HttpClient: Send + Sync {
    /// Executes a resolved request and returns the raw response.
    ///
    /// Any status code is a successful exchange; judging the status is
    /// the caller's job.
    ///
    /// # Errors
    ///
    /// Returns an error if no response was received: network issues,
    /// timeout, or an unreadable body.
    fn execute(
        &self,
        request: &ResolvedRequest,
    ) -> impl Future<Output = Result<HttpResponse, HttpClientError>> + Send;
}

/// Transport-level failures reported by an [`HttpClient`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HttpClientError {
    /// The call exceeded the configured timeout.
    #[error("request timed out after {timeout_ms} ms")]
    Timeout {
        /// Configured timeout.
        timeout_ms: u64,
    },

    /// Nothing listens on the target port.
    #[error("connection refused by {host}:{port}")]
    ConnectionRefused {
        /// Target host.
        host: String,
        /// Target port.
        port: u16,
    },

    /// The host name did not resolve.
    #[error("could not resolve {host}: {message}")]
    DnsError {
        /// Target host.
        host: String,
        /// Resolver message.
        message: String,
    },

    /// Any other connection failure (TLS, reset).
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The URL was rejected by the client.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// Anything else, e.g. a body read failure.
    #[error("{0}")]
    Other(String),
}
