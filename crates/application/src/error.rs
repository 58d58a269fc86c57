//! Application error types

use reqres_domain::{AssertionFailures, DomainError, FailureKind, MappingError};
use thiserror::Error;

use crate::ports::HttpClientError;

/// Application-level errors.
///
/// Every variant maps onto one [`FailureKind`]; a scenario failure report
/// carries that kind plus the rendered message.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// A request could not be built from its parts.
    #[error("configuration error: {0}")]
    Domain(#[from] DomainError),

    /// Scenario data is missing or steps are declared out of order.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The request never produced a response.
    #[error("transport error on {request}: {source}")]
    Transport {
        /// Request description, e.g. `GET http://host/api/users/2`.
        request: String,
        /// Underlying client failure.
        #[source]
        source: HttpClientError,
    },

    /// The response status differs from the declared one.
    #[error("unexpected status on {request}: expected {expected}, got {actual} (body: {body})")]
    UnexpectedStatus {
        /// Request description.
        request: String,
        /// Declared status.
        expected: u16,
        /// Received status.
        actual: u16,
        /// Leading part of the response body.
        body: String,
    },

    /// The response body does not fit the target record.
    #[error("mapping error on {request}: {source}")]
    Mapping {
        /// Request description.
        request: String,
        /// Mapper failure with target type and snippet.
        #[source]
        source: MappingError,
    },

    /// One or more expectations evaluated false.
    #[error("assertion failed: {0}")]
    Assertion(#[from] AssertionFailures),
}

impl ApplicationError {
    /// Classifies this error for reports.
    #[must_use]
    pub const fn kind(&self) -> FailureKind {
        match self {
            Self::Domain(_) | Self::Configuration(_) => FailureKind::Configuration,
            Self::Transport { .. } => FailureKind::Transport,
            Self::UnexpectedStatus { .. } => FailureKind::UnexpectedStatus,
            Self::Mapping { .. } => FailureKind::Mapping,
            Self::Assertion(_) => FailureKind::Assertion,
        }
    }

    /// Shorthand for a configuration error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }
}

/// Result type alias for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
