//! Domain error types

use thiserror::Error;

/// Domain-level errors raised while building or validating requests.
///
/// Every variant is a configuration problem: it is detected before any
/// network call is made.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The resolved URL is invalid or malformed.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// A header name is not a valid HTTP token.
    #[error("invalid header name: {0}")]
    InvalidHeaderName(String),

    /// A path template could not be parsed.
    #[error("invalid path template '{template}': {reason}")]
    InvalidTemplate {
        /// The offending template.
        template: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A placeholder in a path template has no supplied value.
    #[error("path template '{template}' has no value for placeholder '{name}'")]
    UnresolvedPlaceholder {
        /// The template being resolved.
        template: String,
        /// The placeholder without a value.
        name: String,
    },

    /// A path parameter was supplied that the template does not declare.
    #[error("path template '{template}' does not declare parameter '{name}'")]
    UnusedPathParameter {
        /// The template being resolved.
        template: String,
        /// The unexpected parameter name.
        name: String,
    },

    /// The request body could not be serialized.
    #[error("invalid body: {0}")]
    InvalidBody(String),

    /// A scenario state transition is not allowed.
    #[error("invalid scenario transition from {from} to {to}")]
    InvalidTransition {
        /// Current state.
        from: String,
        /// Requested state.
        to: String,
    },
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
