//! Expectation evaluator.
//!
//! Evaluates expectation sets against HTTP responses or typed records and
//! produces test results.

use regex::Regex;
use reqres_domain::testing::{
    AssertionFailures, AssertionResult, ComparisonOperator, Expectation, ExpectationSet,
    StatusExpectation, TestResults,
};
use reqres_domain::HttpResponse;
use serde::Serialize;
use serde_json::Value;

/// What expectations are evaluated against.
struct Subject<'a> {
    response: Option<&'a HttpResponse>,
    json: Result<Value, String>,
}

/// Evaluates expectations against responses and records.
///
/// By default every expectation is evaluated and every failure reported.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExpectationEvaluator {
    /// Whether to stop on first failure.
    stop_on_failure: bool,
}

impl ExpectationEvaluator {
    /// Create a new evaluator.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            stop_on_failure: false,
        }
    }

    /// Set whether to stop on, and report only, the first failure.
    #[must_use]
    pub const fn with_stop_on_failure(mut self, stop: bool) -> Self {
        self.stop_on_failure = stop;
        self
    }

    /// Evaluate a set against a raw response; field paths address the JSON body.
    #[must_use]
    pub fn evaluate_response(&self, set: &ExpectationSet, response: &HttpResponse) -> TestResults {
        let json = if response.is_body_empty() {
            Err("response body is empty".to_string())
        } else {
            serde_json::from_slice(&response.body)
                .map_err(|e| format!("failed to parse body as JSON: {e}"))
        };
        self.evaluate(
            set,
            &Subject {
                response: Some(response),
                json,
            },
        )
    }

    /// Evaluate a set against a JSON value.
    #[must_use]
    pub fn evaluate_value(&self, set: &ExpectationSet, value: &Value) -> TestResults {
        self.evaluate(
            set,
            &Subject {
                response: None,
                json: Ok(value.clone()),
            },
        )
    }

    /// Evaluate a set against a typed record.
    ///
    /// Paths address the record's serialized field names.
    #[must_use]
    pub fn evaluate_record<T: Serialize>(&self, set: &ExpectationSet, record: &T) -> TestResults {
        let json = serde_json::to_value(record).map_err(|e| format!("record not serializable: {e}"));
        self.evaluate(
            set,
            &Subject {
                response: None,
                json,
            },
        )
    }

    /// Evaluate against a response with an all-or-nothing verdict.
    ///
    /// # Errors
    ///
    /// Returns the failed expectations if any failed.
    pub fn check_response(
        &self,
        set: &ExpectationSet,
        response: &HttpResponse,
    ) -> Result<TestResults, AssertionFailures> {
        self.evaluate_response(set, response).into_result()
    }

    /// Evaluate against a record with an all-or-nothing verdict.
    ///
    /// # Errors
    ///
    /// Returns the failed expectations if any failed.
    pub fn check_record<T: Serialize>(
        &self,
        set: &ExpectationSet,
        record: &T,
    ) -> Result<TestResults, AssertionFailures> {
        self.evaluate_record(set, record).into_result()
    }

    fn evaluate(&self, set: &ExpectationSet, subject: &Subject<'_>) -> TestResults {
        let stop = self.stop_on_failure || set.stop_on_failure;
        let mut results = Vec::with_capacity(set.len());

        for expectation in &set.expectations {
            let result = evaluate_one(expectation, subject);
            let failed = !result.passed;
            results.push(result);

            if failed && stop {
                break;
            }
        }

        let results = TestResults::new(&set.name, results);
        tracing::debug!(
            set = %set.name,
            passed = results.passed,
            failed = results.failed,
            "expectations evaluated"
        );
        results
    }
}

fn evaluate_one(expectation: &Expectation, subject: &Subject<'_>) -> AssertionResult {
    match expectation {
        Expectation::StatusCode { expected } => check_status(expectation, subject, expected),
        Expectation::BodyEmpty => check_body_empty(expectation, subject),
        Expectation::ContentType { expected } => check_content_type(expectation, subject, expected),
        Expectation::FieldEquals { path, .. }
        | Expectation::FieldPresent { path }
        | Expectation::FieldNotBlank { path }
        | Expectation::FieldContains { path, .. }
        | Expectation::FieldMatches { path, .. }
        | Expectation::FieldCompare { path, .. }
        | Expectation::CollectionNotEmpty { path }
        | Expectation::CollectionSize { path, .. } => {
            let json = match &subject.json {
                Ok(json) => json,
                Err(e) => return AssertionResult::fail(expectation.clone(), e.clone()),
            };
            match query_json_path(json, path) {
                Ok(Some(value)) => check_field(expectation, path, value),
                Ok(None) => {
                    AssertionResult::fail(expectation.clone(), format!("field '{path}' not found"))
                }
                Err(e) => {
                    AssertionResult::fail(expectation.clone(), format!("invalid path '{path}': {e}"))
                }
            }
        }
    }
}

fn check_status(
    expectation: &Expectation,
    subject: &Subject<'_>,
    expected: &StatusExpectation,
) -> AssertionResult {
    let Some(response) = subject.response else {
        return AssertionResult::fail(expectation.clone(), "status requires a response");
    };
    let actual = response.status;
    if expected.matches(actual) {
        AssertionResult::pass_with_value(expectation.clone(), actual.to_string())
    } else {
        AssertionResult::fail_with_value(
            expectation.clone(),
            actual.to_string(),
            format!("expected status {}, got {actual}", expected.description()),
        )
    }
}

fn check_body_empty(expectation: &Expectation, subject: &Subject<'_>) -> AssertionResult {
    let Some(response) = subject.response else {
        return AssertionResult::fail(expectation.clone(), "body check requires a response");
    };
    if response.is_body_empty() {
        AssertionResult::pass(expectation.clone())
    } else {
        AssertionResult::fail_with_value(
            expectation.clone(),
            response.body_snippet(100),
            "body is not empty",
        )
    }
}

fn check_content_type(
    expectation: &Expectation,
    subject: &Subject<'_>,
    expected: &str,
) -> AssertionResult {
    let Some(response) = subject.response else {
        return AssertionResult::fail(expectation.clone(), "content type requires a response");
    };
    match response.content_type() {
        Some(actual) if actual.contains(expected) => {
            AssertionResult::pass_with_value(expectation.clone(), actual)
        }
        Some(actual) => AssertionResult::fail_with_value(
            expectation.clone(),
            actual,
            format!("Content-Type '{actual}' does not contain '{expected}'"),
        ),
        None => AssertionResult::fail(expectation.clone(), "no Content-Type header present"),
    }
}

fn check_field(expectation: &Expectation, path: &str, value: &Value) -> AssertionResult {
    let actual = display_value(value);
    let verdict: Result<(), String> = match expectation {
        Expectation::FieldEquals { expected, .. } => {
            if value == expected {
                Ok(())
            } else {
                Err(format!("'{path}' is {actual}, expected {expected}"))
            }
        }
        Expectation::FieldPresent { .. } => {
            if value.is_null() {
                Err(format!("'{path}' is null"))
            } else {
                Ok(())
            }
        }
        Expectation::FieldNotBlank { .. } => match value {
            Value::Null => Err(format!("'{path}' is null")),
            Value::String(s) if s.trim().is_empty() => Err(format!("'{path}' is blank")),
            _ => Ok(()),
        },
        Expectation::FieldContains { needle, .. } => match value {
            Value::String(s) if s.contains(needle.as_str()) => Ok(()),
            Value::String(_) => Err(format!("'{path}' does not contain '{needle}'")),
            _ => Err(format!("'{path}' is not a string")),
        },
        Expectation::FieldMatches { pattern, .. } => match (Regex::new(pattern), value) {
            (Err(e), _) => Err(format!("invalid regex pattern '{pattern}': {e}")),
            (Ok(re), Value::String(s)) if re.is_match(s) => Ok(()),
            (Ok(_), Value::String(_)) => Err(format!("'{path}' does not match /{pattern}/")),
            (Ok(_), _) => Err(format!("'{path}' is not a string")),
        },
        Expectation::FieldCompare {
            operator,
            value: expected,
            ..
        } => {
            if compare_json_values(value, *operator, expected) {
                Ok(())
            } else {
                Err(format!(
                    "'{path}' comparison failed: {actual} {} {expected}",
                    operator.symbol()
                ))
            }
        }
        Expectation::CollectionNotEmpty { .. } => match value {
            Value::Array(items) if !items.is_empty() => Ok(()),
            Value::Array(_) => Err(format!("'{path}' is empty")),
            _ => Err(format!("'{path}' is not an array")),
        },
        Expectation::CollectionSize { operator, size, .. } => match value {
            Value::Array(items) if operator.compare(&items.len(), size) => Ok(()),
            Value::Array(items) => Err(format!(
                "len('{path}') is {}, expected {} {size}",
                items.len(),
                operator.symbol()
            )),
            _ => Err(format!("'{path}' is not an array")),
        },
        Expectation::StatusCode { .. } | Expectation::BodyEmpty | Expectation::ContentType { .. } => {
            Err("not a field expectation".to_string())
        }
    };

    match verdict {
        Ok(()) => AssertionResult::pass_with_value(expectation.clone(), actual),
        Err(message) => AssertionResult::fail_with_value(expectation.clone(), actual, message),
    }
}

/// Strings are shown without quotes, everything else as JSON.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Segment<'p> {
    Key(&'p str),
    Index(usize),
    Wildcard,
}

/// Query a JSON value using a simple JSONPath-like syntax.
/// Supports: $, $.field, $.field.nested, $.array[0], $.array[0].field, $.array[*]
/// A wildcard must be the last segment.
fn query_json_path<'v>(json: &'v Value, path: &str) -> Result<Option<&'v Value>, String> {
    let mut current = json;
    for segment in parse_path(path)? {
        let next = match segment {
            Segment::Key(key) => current.get(key),
            Segment::Index(index) => current.get(index),
            // The whole array is the value
            Segment::Wildcard => return Ok(current.is_array().then_some(current)),
        };
        match next {
            Some(value) => current = value,
            None => return Ok(None),
        }
    }
    Ok(Some(current))
}

fn parse_path(path: &str) -> Result<Vec<Segment<'_>>, String> {
    let path = path.trim();
    let rest = path
        .strip_prefix('$')
        .ok_or_else(|| "JSON path must start with '$'".to_string())?;

    let mut segments = Vec::new();
    let mut rest = rest;
    while !rest.is_empty() {
        if let Some(after_dot) = rest.strip_prefix('.') {
            let end = after_dot.find(['.', '[']).unwrap_or(after_dot.len());
            let key = &after_dot[..end];
            if key.is_empty() {
                return Err("empty field name".to_string());
            }
            segments.push(Segment::Key(key));
            rest = &after_dot[end..];
        } else if let Some(after_bracket) = rest.strip_prefix('[') {
            let end = after_bracket
                .find(']')
                .ok_or_else(|| "unclosed '['".to_string())?;
            let index = &after_bracket[..end];
            rest = &after_bracket[end + 1..];
            if index == "*" {
                if !rest.is_empty() {
                    return Err("segments after [*] are not supported".to_string());
                }
                segments.push(Segment::Wildcard);
            } else {
                let index = index
                    .parse()
                    .map_err(|_| format!("invalid array index: {index}"))?;
                segments.push(Segment::Index(index));
            }
        } else {
            return Err(format!("unexpected '{rest}'"));
        }
    }
    Ok(segments)
}

/// Compare two JSON values using the given operator.
///
/// Ordering works on numbers and on strings; mixed types never order.
fn compare_json_values(actual: &Value, operator: ComparisonOperator, expected: &Value) -> bool {
    match operator {
        ComparisonOperator::Equals => actual == expected,
        ComparisonOperator::NotEquals => actual != expected,
        _ => match (actual, expected) {
            (Value::Number(a), Value::Number(b)) => match (a.as_f64(), b.as_f64()) {
                (Some(a), Some(b)) => operator.compare(&a, &b),
                _ => false,
            },
            (Value::String(a), Value::String(b)) => operator.compare(a, b),
            _ => false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use reqres_domain::request::{Header, Headers};
    use reqres_domain::{UserMutationRecord, UserPayload};
    use serde_json::json;
    use std::time::Duration;

    const LIST_BODY: &str = r#"{
        "page": 2, "per_page": 6, "total": 12, "total_pages": 2,
        "data": [
            {"id": 7, "email": "michael.lawson@reqres.in", "first_name": "Michael", "last_name": "Lawson", "avatar": ""},
            {"id": 8, "email": "lindsay.ferguson@reqres.in", "first_name": "Lindsay", "last_name": "Ferguson", "avatar": ""}
        ]
    }"#;

    fn json_response(status: u16, body: &str) -> HttpResponse {
        let headers: Headers = [Header::new("Content-Type", "application/json; charset=utf-8")]
            .into_iter()
            .collect();
        HttpResponse::new(status, headers, body.as_bytes().to_vec(), Duration::from_millis(50))
    }

    #[test]
    fn test_query_json_path() {
        let json = json!({"data": [{"id": 7}, {"id": 8}], "support": {"url": "u"}});
        assert_eq!(query_json_path(&json, "$"), Ok(Some(&json)));
        assert_eq!(query_json_path(&json, "$.data[1].id"), Ok(Some(&json!(8))));
        assert_eq!(query_json_path(&json, "$.support.url"), Ok(Some(&json!("u"))));
        assert_eq!(query_json_path(&json, "$.data[*]"), Ok(Some(&json["data"])));
        assert_eq!(query_json_path(&json, "$.data[5]"), Ok(None));
        assert_eq!(query_json_path(&json, "$.missing.id"), Ok(None));
        assert!(query_json_path(&json, "data").is_err());
        assert!(query_json_path(&json, "$.data[x]").is_err());
        assert!(query_json_path(&json, "$.data[0").is_err());
        assert!(query_json_path(&json, "$.data[*].id").is_err());
    }

    #[test]
    fn test_wildcard_with_trailing_segments_fails() {
        let set = ExpectationSet::new("nested wildcard")
            .with(Expectation::collection_not_empty("$.data[*].no_such_field"))
            .with(Expectation::collection_size(
                "$.data[*].nope.deeper",
                ComparisonOperator::Equals,
                2,
            ))
            .with(Expectation::collection_size("$.data[*]", ComparisonOperator::Equals, 2));

        let results = ExpectationEvaluator::new().evaluate_value(&set, &json!({"data": [{"id": 7}, {"id": 8}]}));

        assert_eq!(results.passed, 1);
        assert_eq!(results.failed, 2);
        let failures = results.failures();
        assert_eq!(failures[0].path, "$.data[*].no_such_field");
        assert!(failures[0].message.contains("segments after [*]"), "{}", failures[0].message);
        assert_eq!(failures[1].path, "$.data[*].nope.deeper");
    }

    #[test]
    fn test_list_expectations_pass() {
        let set = ExpectationSet::new("users list")
            .with(Expectation::status(200))
            .with(Expectation::ContentType {
                expected: "application/json".to_string(),
            })
            .with(Expectation::field_equals("$.page", 2))
            .with(Expectation::collection_not_empty("$.data"))
            .with(Expectation::collection_size(
                "$.data",
                ComparisonOperator::LessThanOrEqual,
                6,
            ))
            .with(Expectation::field_contains("$.data[0].email", "@"))
            .with(Expectation::FieldCompare {
                path: "$.total".to_string(),
                operator: ComparisonOperator::GreaterThan,
                value: json!(0),
            });

        let results = ExpectationEvaluator::new().evaluate_response(&set, &json_response(200, LIST_BODY));

        assert!(results.all_passed(), "{:?}", results.failures());
        assert_eq!(results.total, 7);
    }

    #[test]
    fn test_every_failure_is_reported() {
        let set = ExpectationSet::new("wrong page")
            .with(Expectation::status(201))
            .with(Expectation::field_equals("$.page", 1))
            .with(Expectation::field_present("$.nope"));

        let error = ExpectationEvaluator::new()
            .check_response(&set, &json_response(200, LIST_BODY))
            .expect_err("three failures");

        assert_eq!(error.set, "wrong page");
        assert_eq!(error.failures.len(), 3);
        assert_eq!(error.failures[0].path, "status");
        assert_eq!(error.failures[0].actual, "200");
        assert_eq!(error.failures[1].path, "$.page");
        assert_eq!(error.failures[1].expected, "$.page == 1");
        assert_eq!(error.failures[1].actual, "2");
        assert_eq!(error.failures[2].actual, "<absent>");
    }

    #[test]
    fn test_stop_on_failure_reports_first_only() {
        let set = ExpectationSet::new("wrong page")
            .with(Expectation::status(201))
            .with(Expectation::field_equals("$.page", 1));

        let evaluator = ExpectationEvaluator::new().with_stop_on_failure(true);
        let results = evaluator.evaluate_response(&set, &json_response(200, LIST_BODY));
        assert_eq!(results.total, 1);
        assert_eq!(results.failed, 1);

        let results = ExpectationEvaluator::new()
            .evaluate_response(&set.stopping_on_failure(), &json_response(200, LIST_BODY));
        assert_eq!(results.total, 1);
    }

    #[test]
    fn test_body_empty() {
        let deleted = HttpResponse::new(204u16, Headers::new(), Vec::new(), Duration::ZERO);
        let set = ExpectationSet::new("deleted")
            .with(Expectation::status(204))
            .with(Expectation::BodyEmpty);
        assert!(ExpectationEvaluator::new().evaluate_response(&set, &deleted).all_passed());

        let results = ExpectationEvaluator::new().evaluate_response(&set, &json_response(204, "{}"));
        assert_eq!(results.failed, 1);

        let whitespace = HttpResponse::new(204, Headers::new(), b" \n".to_vec(), Duration::ZERO);
        let results = ExpectationEvaluator::new().evaluate_response(&set, &whitespace);
        assert_eq!(results.failed, 1);
        assert_eq!(results.failures()[0].message, "body is not empty");
    }

    #[test]
    fn test_field_on_unparseable_body_fails() {
        let set = ExpectationSet::new("page").with(Expectation::field_present("$.page"));
        let results = ExpectationEvaluator::new().evaluate_response(&set, &json_response(200, "<html>"));
        assert_eq!(results.failed, 1);
        let failure = &results.failures()[0];
        assert!(failure.message.contains("failed to parse body as JSON"));
    }

    #[test]
    fn test_record_expectations() {
        let payload = UserPayload::new("morpheus", "leader");
        let record = UserMutationRecord {
            name: "morpheus".to_string(),
            job: "leader".to_string(),
            id: Some("523".to_string()),
            created_at: Some("2026-10-16T08:30:12.345Z".to_string()),
            updated_at: None,
        };
        let set = ExpectationSet::new("created user")
            .with(Expectation::field_equals("$.name", payload.name.as_str()))
            .with(Expectation::field_equals("$.job", payload.job.as_str()))
            .with(Expectation::field_not_blank("$.id"))
            .with(Expectation::field_matches(
                "$.createdAt",
                reqres_domain::contract::ISO_TIMESTAMP_PATTERN,
            ));

        assert!(ExpectationEvaluator::new().check_record(&set, &record).is_ok());

        let blank = UserMutationRecord {
            id: Some("  ".to_string()),
            created_at: Some("yesterday".to_string()),
            ..record
        };
        let error = ExpectationEvaluator::new()
            .check_record(&set, &blank)
            .expect_err("blank id and bad timestamp");
        let paths: Vec<_> = error.failures.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec!["$.id", "$.createdAt"]);
    }

    #[test]
    fn test_status_requires_response() {
        let set = ExpectationSet::new("status").with(Expectation::status(200));
        let results = ExpectationEvaluator::new().evaluate_value(&set, &json!({}));
        assert_eq!(results.failed, 1);
    }

    #[test]
    fn test_compare_json_values() {
        assert!(compare_json_values(&json!(5), ComparisonOperator::GreaterThan, &json!(3)));
        assert!(compare_json_values(&json!("b"), ComparisonOperator::GreaterThan, &json!("a")));
        assert!(!compare_json_values(&json!("5"), ComparisonOperator::GreaterThan, &json!(3)));
        assert!(compare_json_values(&json!(null), ComparisonOperator::Equals, &json!(null)));
    }
}
