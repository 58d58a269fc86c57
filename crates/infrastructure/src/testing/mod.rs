//! Expectation evaluation.
//!
//! This module provides the evaluator that checks expectation sets against
//! HTTP responses and typed records.

mod runner;

pub use runner::ExpectationEvaluator;
