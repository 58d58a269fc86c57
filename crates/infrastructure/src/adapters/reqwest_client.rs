//! HTTP Client implementation using reqwest.
//!
//! This adapter implements the `HttpClient` port using the reqwest library.
//! It handles all HTTP communication for the suite.

use std::future::Future;
use std::time::{Duration, Instant};

use reqres_application::ports::{HttpClient, HttpClientError};
use reqres_domain::{
    HttpMethod, HttpResponse, ResolvedRequest,
    request::{Header, Headers, RequestBodyKind},
};
use reqwest::{Client, Method, header::HeaderMap};

const LOG_BODY_CHARS: usize = 500;

/// HTTP client implementation using reqwest.
///
/// Wraps a `reqwest::Client`, which pools connections and is cheap to share.
/// Every call is bounded by the timeout given at construction.
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: Client,
    timeout: Duration,
}

impl ReqwestHttpClient {
    /// Creates a new HTTP client.
    ///
    /// Configuration:
    /// - Per-request timeout: `timeout`
    /// - Follow redirects: up to 10
    /// - TLS verification: enabled
    /// - User-Agent: `user_agent`
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be created.
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, HttpClientError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| HttpClientError::Other(e.to_string()))?;

        Ok(Self { client, timeout })
    }

    /// Converts domain `HttpMethod` to reqwest `Method`.
    const fn to_reqwest_method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Patch => Method::PATCH,
            HttpMethod::Delete => Method::DELETE,
        }
    }

    fn timeout_ms(&self) -> u64 {
        u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX)
    }

    /// Maps reqwest errors to the port's `HttpClientError`.
    fn map_error(error: &reqwest::Error, timeout_ms: u64) -> HttpClientError {
        if error.is_timeout() {
            return HttpClientError::Timeout { timeout_ms };
        }

        let host = error
            .url()
            .and_then(|u| u.host_str())
            .unwrap_or("unknown")
            .to_string();

        if error.is_connect() {
            // The interesting cause sits deep in the source chain.
            let message = error_chain(error);
            let lower = message.to_lowercase();
            if lower.contains("dns") || lower.contains("resolve") {
                return HttpClientError::DnsError { host, message };
            }
            if lower.contains("refused") {
                return HttpClientError::ConnectionRefused {
                    host,
                    port: error
                        .url()
                        .and_then(reqwest::Url::port_or_known_default)
                        .unwrap_or(80),
                };
            }
            return HttpClientError::ConnectionFailed(message);
        }

        if error.is_builder() {
            return HttpClientError::InvalidUrl(error_chain(error));
        }

        HttpClientError::Other(error_chain(error))
    }

    async fn send(&self, request: &ResolvedRequest) -> Result<HttpResponse, HttpClientError> {
        let timeout_ms = self.timeout_ms();

        tracing::debug!(
            method = %request.method,
            url = %request.url,
            headers = ?request.headers.iter().map(|h| h.name.as_str()).collect::<Vec<_>>(),
            body = %truncate(&request.body.content, LOG_BODY_CHARS),
            "http request"
        );

        let mut builder = self
            .client
            .request(Self::to_reqwest_method(request.method), request.url.clone());
        for header in request.headers.iter() {
            builder = builder.header(header.name.as_str(), header.value.as_str());
        }
        if let RequestBodyKind::Raw { .. } = request.body.kind {
            builder = builder.body(request.body.content.clone());
        }

        let start = Instant::now();
        let response = builder
            .send()
            .await
            .map_err(|e| Self::map_error(&e, timeout_ms))?;

        let status = response.status().as_u16();
        let headers = collect_headers(response.headers());

        let body = response
            .bytes()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    HttpClientError::Timeout { timeout_ms }
                } else {
                    HttpClientError::Other(format!("failed to read body: {e}"))
                }
            })?
            .to_vec();
        let duration = start.elapsed();

        let response = HttpResponse::new(status, headers, body, duration);
        tracing::debug!(
            method = %request.method,
            url = %request.url,
            status,
            duration = %response.duration_display(),
            "http response"
        );
        tracing::trace!(body = %response.body_snippet(LOG_BODY_CHARS), "http response body");
        Ok(response)
    }
}

impl HttpClient for ReqwestHttpClient {
    fn execute(
        &self,
        request: &ResolvedRequest,
    ) -> impl Future<Output = Result<HttpResponse, HttpClientError>> + Send {
        self.send(request)
    }
}

/// Repeated header names are joined into one comma-separated value.
fn collect_headers(map: &HeaderMap) -> Headers {
    let mut headers = Headers::new();
    for (name, value) in map {
        headers.append(Header::new(name.as_str(), value.to_str().unwrap_or("<binary>")));
    }
    headers
}

fn error_chain(error: &reqwest::Error) -> String {
    let mut message = error.to_string();
    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

fn truncate(text: &str, max_chars: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}
