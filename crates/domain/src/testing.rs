//! Declarative expectations over responses and records.
//!
//! This module provides the predicate types and their results; evaluation
//! lives in the infrastructure layer.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A predicate checked against a response or a record.
///
/// Field paths use `$.field.nested[0]` syntax.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Expectation {
    /// Check the response status code.
    StatusCode {
        /// Expected status code or range.
        expected: StatusExpectation,
    },
    /// Field equals a JSON value.
    FieldEquals {
        /// Field path.
        path: String,
        /// Expected value.
        expected: serde_json::Value,
    },
    /// Field exists and is not null.
    FieldPresent {
        /// Field path.
        path: String,
    },
    /// Field exists, is not null and, if a string, is not blank.
    FieldNotBlank {
        /// Field path.
        path: String,
    },
    /// String field contains a substring.
    FieldContains {
        /// Field path.
        path: String,
        /// Text to search for.
        needle: String,
    },
    /// String field matches a regex.
    FieldMatches {
        /// Field path.
        path: String,
        /// Regex pattern.
        pattern: String,
    },
    /// Field compares against a value.
    FieldCompare {
        /// Field path.
        path: String,
        /// Comparison operator.
        operator: ComparisonOperator,
        /// Value to compare against.
        value: serde_json::Value,
    },
    /// Array field is not empty.
    CollectionNotEmpty {
        /// Field path.
        path: String,
    },
    /// Array field length compares against a bound.
    CollectionSize {
        /// Field path.
        path: String,
        /// Comparison operator.
        operator: ComparisonOperator,
        /// Bound.
        size: usize,
    },
    /// Response body is empty.
    BodyEmpty,
    /// Content type contains text.
    ContentType {
        /// Expected content type (partial match).
        expected: String,
    },
}

impl Expectation {
    /// Field equals a value convertible to JSON.
    pub fn field_equals(path: impl Into<String>, expected: impl Into<serde_json::Value>) -> Self {
        Self::FieldEquals {
            path: path.into(),
            expected: expected.into(),
        }
    }

    /// Field is present and not null.
    pub fn field_present(path: impl Into<String>) -> Self {
        Self::FieldPresent { path: path.into() }
    }

    /// Field is present and not blank.
    pub fn field_not_blank(path: impl Into<String>) -> Self {
        Self::FieldNotBlank { path: path.into() }
    }

    /// String field contains `needle`.
    pub fn field_contains(path: impl Into<String>, needle: impl Into<String>) -> Self {
        Self::FieldContains {
            path: path.into(),
            needle: needle.into(),
        }
    }

    /// String field matches `pattern`.
    pub fn field_matches(path: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self::FieldMatches {
            path: path.into(),
            pattern: pattern.into(),
        }
    }

    /// Array field is not empty.
    pub fn collection_not_empty(path: impl Into<String>) -> Self {
        Self::CollectionNotEmpty { path: path.into() }
    }

    /// Array field length compared with `size`.
    pub fn collection_size(path: impl Into<String>, operator: ComparisonOperator, size: usize) -> Self {
        Self::CollectionSize {
            path: path.into(),
            operator,
            size,
        }
    }

    /// Status equals `code`.
    #[must_use]
    pub const fn status(code: u16) -> Self {
        Self::StatusCode {
            expected: StatusExpectation::Exact(code),
        }
    }

    /// The field path this expectation inspects, if any.
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::FieldEquals { path, .. }
            | Self::FieldPresent { path }
            | Self::FieldNotBlank { path }
            | Self::FieldContains { path, .. }
            | Self::FieldMatches { path, .. }
            | Self::FieldCompare { path, .. }
            | Self::CollectionNotEmpty { path }
            | Self::CollectionSize { path, .. } => Some(path),
            Self::StatusCode { .. } => Some("status"),
            Self::BodyEmpty => Some("body"),
            Self::ContentType { .. } => Some("content-type"),
        }
    }

    /// Get a human-readable description of the expected condition.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::StatusCode { expected } => format!("status {}", expected.description()),
            Self::FieldEquals { path, expected } => format!("{path} == {expected}"),
            Self::FieldPresent { path } => format!("{path} is present"),
            Self::FieldNotBlank { path } => format!("{path} is not blank"),
            Self::FieldContains { path, needle } => format!("{path} contains '{needle}'"),
            Self::FieldMatches { path, pattern } => format!("{path} matches /{pattern}/"),
            Self::FieldCompare {
                path,
                operator,
                value,
            } => format!("{path} {} {value}", operator.symbol()),
            Self::CollectionNotEmpty { path } => format!("{path} is not empty"),
            Self::CollectionSize {
                path,
                operator,
                size,
            } => format!("len({path}) {} {size}", operator.symbol()),
            Self::BodyEmpty => "body is empty".to_string(),
            Self::ContentType { expected } => format!("content-type contains '{expected}'"),
        }
    }
}

/// Expected status code value or range.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum StatusExpectation {
    /// Exact status code.
    Exact(u16),
    /// Range of status codes (e.g., 200-299).
    Range {
        /// Minimum status code (inclusive).
        min: u16,
        /// Maximum status code (inclusive).
        max: u16,
    },
    /// One of multiple status codes.
    OneOf(Vec<u16>),
}

impl StatusExpectation {
    /// Check if a status code matches this expectation.
    #[must_use]
    pub fn matches(&self, status: u16) -> bool {
        match self {
            Self::Exact(expected) => status == *expected,
            Self::Range { min, max } => (*min..=*max).contains(&status),
            Self::OneOf(codes) => codes.contains(&status),
        }
    }

    /// Get description of the expectation.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::Exact(code) => format!("= {code}"),
            Self::Range { min, max } => format!("in {min}-{max}"),
            Self::OneOf(codes) => {
                let codes_str: Vec<_> = codes.iter().map(ToString::to_string).collect();
                format!("in [{}]", codes_str.join(", "))
            }
        }
    }
}

/// Comparison operators for value assertions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonOperator {
    /// Equal to.
    Equals,
    /// Not equal to.
    NotEquals,
    /// Greater than.
    GreaterThan,
    /// Greater than or equal to.
    GreaterThanOrEqual,
    /// Less than.
    LessThan,
    /// Less than or equal to.
    LessThanOrEqual,
}

impl ComparisonOperator {
    /// Get the symbol for this operator.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::Equals => "==",
            Self::NotEquals => "!=",
            Self::GreaterThan => ">",
            Self::GreaterThanOrEqual => ">=",
            Self::LessThan => "<",
            Self::LessThanOrEqual => "<=",
        }
    }

    /// Applies the operator to two ordered values.
    #[must_use]
    pub fn compare<T: PartialOrd>(&self, actual: &T, expected: &T) -> bool {
        match self {
            Self::Equals => actual == expected,
            Self::NotEquals => actual != expected,
            Self::GreaterThan => actual > expected,
            Self::GreaterThanOrEqual => actual >= expected,
            Self::LessThan => actual < expected,
            Self::LessThanOrEqual => actual <= expected,
        }
    }
}

/// Result of evaluating a single expectation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssertionResult {
    /// The expectation that was evaluated.
    pub expectation: Expectation,
    /// Whether it held.
    pub passed: bool,
    /// Actual value found (for display).
    pub actual: Option<String>,
    /// Error message if failed.
    pub error: Option<String>,
}

impl AssertionResult {
    /// Create a passed result.
    #[must_use]
    pub const fn pass(expectation: Expectation) -> Self {
        Self {
            expectation,
            passed: true,
            actual: None,
            error: None,
        }
    }

    /// Create a passed result with actual value.
    #[must_use]
    pub fn pass_with_value(expectation: Expectation, actual: impl Into<String>) -> Self {
        Self {
            expectation,
            passed: true,
            actual: Some(actual.into()),
            error: None,
        }
    }

    /// Create a failed result.
    #[must_use]
    pub fn fail(expectation: Expectation, error: impl Into<String>) -> Self {
        Self {
            expectation,
            passed: false,
            actual: None,
            error: Some(error.into()),
        }
    }

    /// Create a failed result with actual value.
    #[must_use]
    pub fn fail_with_value(
        expectation: Expectation,
        actual: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            expectation,
            passed: false,
            actual: Some(actual.into()),
            error: Some(error.into()),
        }
    }
}

/// A named set of expectations evaluated together.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ExpectationSet {
    /// Name used in failure reports.
    pub name: String,
    /// Expectations, evaluated in order.
    #[serde(default)]
    pub expectations: Vec<Expectation>,
    /// Whether to stop at, and report only, the first failure.
    #[serde(default)]
    pub stop_on_failure: bool,
}

impl ExpectationSet {
    /// Create a new empty set.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            expectations: Vec::new(),
            stop_on_failure: false,
        }
    }

    /// Add an expectation (builder pattern).
    #[must_use]
    pub fn with(mut self, expectation: Expectation) -> Self {
        self.expectations.push(expectation);
        self
    }

    /// Report only the first failure.
    #[must_use]
    pub const fn stopping_on_failure(mut self) -> Self {
        self.stop_on_failure = true;
        self
    }

    /// Check if the set is empty.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn is_empty(&self) -> bool {
        self.expectations.is_empty()
    }

    /// Get the number of expectations.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn len(&self) -> usize {
        self.expectations.len()
    }
}

/// One failed expectation, as reported to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssertionFailure {
    /// Inspected field path.
    pub path: String,
    /// Expected condition.
    pub expected: String,
    /// Actual value, or `<absent>`.
    pub actual: String,
    /// Evaluator message.
    pub message: String,
}

impl std::fmt::Display for AssertionFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: expected {}, actual {} ({})",
            self.path, self.expected, self.actual, self.message
        )
    }
}

/// Every failed expectation of an [`ExpectationSet`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{set}: {} expectation(s) failed: {}", .failures.len(), join_failures(.failures))]
pub struct AssertionFailures {
    /// Name of the set.
    pub set: String,
    /// Failed expectations, in evaluation order.
    pub failures: Vec<AssertionFailure>,
}

fn join_failures(failures: &[AssertionFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Results from evaluating an expectation set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TestResults {
    /// Set that was evaluated.
    pub set_name: String,
    /// Individual results.
    pub results: Vec<AssertionResult>,
    /// Number of evaluated expectations.
    pub total: usize,
    /// Number of passed expectations.
    pub passed: usize,
    /// Number of failed expectations.
    pub failed: usize,
}

impl TestResults {
    /// Create new test results.
    #[must_use]
    pub fn new(set_name: impl Into<String>, results: Vec<AssertionResult>) -> Self {
        let total = results.len();
        let passed = results.iter().filter(|r| r.passed).count();
        let failed = total - passed;

        Self {
            set_name: set_name.into(),
            results,
            total,
            passed,
            failed,
        }
    }

    /// Check if all expectations held.
    #[must_use]
    pub const fn all_passed(&self) -> bool {
        self.failed == 0
    }

    /// Returns the failed expectations with path, expected and actual.
    #[must_use]
    pub fn failures(&self) -> Vec<AssertionFailure> {
        self.results
            .iter()
            .filter(|r| !r.passed)
            .map(|r| AssertionFailure {
                path: r.expectation.path().unwrap_or("$").to_string(),
                expected: r.expectation.description(),
                actual: r.actual.clone().unwrap_or_else(|| "<absent>".to_string()),
                message: r.error.clone().unwrap_or_default(),
            })
            .collect()
    }

    /// All-or-nothing verdict.
    ///
    /// # Errors
    ///
    /// Returns every failure when at least one expectation failed.
    pub fn into_result(self) -> Result<Self, AssertionFailures> {
        if self.all_passed() {
            Ok(self)
        } else {
            Err(AssertionFailures {
                failures: self.failures(),
                set: self.set_name,
            })
        }
    }
}
