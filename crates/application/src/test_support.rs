//! In-memory `HttpClient` used by unit tests.

use std::collections::VecDeque;
use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;

use reqres_domain::{
    HttpMethod, HttpResponse, PathTemplate, RequestSpec, ResolvedRequest,
    request::{Header, Headers},
};

use crate::ports::{HttpClient, HttpClientError};

/// Replays queued responses in order and records every request it sees.
pub struct StubHttpClient {
    responses: Mutex<VecDeque<Result<HttpResponse, HttpClientError>>>,
    sent: Mutex<Vec<ResolvedRequest>>,
}

impl StubHttpClient {
    pub fn new(responses: Vec<Result<HttpResponse, HttpClientError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn sent(&self) -> Vec<ResolvedRequest> {
        self.sent.lock().expect("lock").clone()
    }
}

impl HttpClient for StubHttpClient {
    fn execute(
        &self,
        request: &ResolvedRequest,
    ) -> impl Future<Output = Result<HttpResponse, HttpClientError>> + Send {
        self.sent.lock().expect("lock").push(request.clone());
        let next = self
            .responses
            .lock()
            .expect("lock")
            .pop_front()
            .unwrap_or_else(|| Err(HttpClientError::Other("no stubbed response".to_string())));
        async move { next }
    }
}

pub fn json_response(status: u16, body: &str) -> HttpResponse {
    let headers: Headers = [Header::new("Content-Type", "application/json; charset=utf-8")]
        .into_iter()
        .collect();
    HttpResponse::new(status, headers, body.as_bytes().to_vec(), Duration::from_millis(5))
}

pub fn empty_response(status: u16) -> HttpResponse {
    HttpResponse::new(status, Headers::new(), Vec::new(), Duration::from_millis(5))
}

pub fn stub_spec() -> RequestSpec {
    RequestSpec::new("stub", "http://stub.local").with_base_path("/api")
}

pub fn request(path: &str) -> ResolvedRequest {
    let template = PathTemplate::parse(path).expect("valid template");
    stub_spec()
        .request(HttpMethod::Get, &template)
        .build()
        .expect("valid request")
}
