//! Execute Request Use Case
//!
//! Sends a resolved request through the `HttpClient` port and checks the
//! response against a `ResponseSpec` before anyone looks at the body.

use std::sync::Arc;

use reqres_domain::{
    HttpResponse, ResolvedRequest, ResponseSpec, TestResults,
    response::ResponseMismatch,
    testing::{AssertionResult, Expectation},
};

use crate::error::{ApplicationError, ApplicationResult};
use crate::ports::HttpClient;

const BODY_SNIPPET_CHARS: usize = 200;

/// Use case for executing HTTP requests.
///
/// # Example
///
/// ```ignore
/// let use_case = ExecuteRequest::new(Arc::new(ReqwestHttpClient::new(timeout, agent)?));
/// let response = use_case.execute(&request, &ResponseSpec::ok()).await?;
/// ```
pub struct ExecuteRequest<C: HttpClient> {
    client: Arc<C>,
}

impl<C: HttpClient> Clone for ExecuteRequest<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
        }
    }
}

impl<C: HttpClient> ExecuteRequest<C> {
    /// Creates a new `ExecuteRequest` use case with the given HTTP client.
    pub const fn new(client: Arc<C>) -> Self {
        Self { client }
    }

    /// Sends `request` and verifies the response against `expected`.
    ///
    /// # Errors
    ///
    /// - `Transport` when no response arrived
    /// - `UnexpectedStatus` when the status differs
    /// - `Assertion` when the content type differs
    pub async fn execute(
        &self,
        request: &ResolvedRequest,
        expected: &ResponseSpec,
    ) -> ApplicationResult<HttpResponse> {
        tracing::debug!(request = %request, expected = expected.status, "sending request");

        let response = self
            .client
            .execute(request)
            .await
            .map_err(|source| ApplicationError::Transport {
                request: request.describe(),
                source,
            })?;

        tracing::debug!(
            request = %request,
            status = response.status,
            duration = %response.duration_display(),
            "received response"
        );

        verify(request, expected, &response)?;
        Ok(response)
    }
}

fn verify(
    request: &ResolvedRequest,
    expected: &ResponseSpec,
    response: &HttpResponse,
) -> ApplicationResult<()> {
    match expected.verify(response) {
        Ok(()) => Ok(()),
        Err(ResponseMismatch::Status { expected, actual }) => {
            Err(ApplicationError::UnexpectedStatus {
                request: request.describe(),
                expected,
                actual,
                body: response.body_snippet(BODY_SNIPPET_CHARS),
            })
        }
        Err(mismatch @ ResponseMismatch::ContentType { .. }) => {
            let expectation = Expectation::ContentType {
                expected: expected.content_type.clone().unwrap_or_default(),
            };
            let actual = response.content_type().unwrap_or("<absent>").to_string();
            let results = TestResults::new(
                format!("{} ({})", expected.name, request.describe()),
                vec![AssertionResult::fail_with_value(
                    expectation,
                    actual,
                    mismatch.to_string(),
                )],
            );
            results.into_result().map(|_| ()).map_err(ApplicationError::from)
        }
    }
}
