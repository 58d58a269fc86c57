//! Reqres Infrastructure - Adapters and implementations
//!
//! This crate provides the reqwest implementation of the `HttpClient` port,
//! the expectation evaluator, configuration loading, tracing setup and
//! report files.

pub mod adapters;
pub mod config;
pub mod report;
pub mod serialization;
pub mod telemetry;
pub mod testing;

pub use adapters::ReqwestHttpClient;
pub use self::config::{ConfigError, HarnessConfig};
pub use report::{ReportError, read_report, write_report};
pub use serialization::{SerializationError, from_json_bytes, to_json_stable};
pub use telemetry::init_tracing;
pub use testing::ExpectationEvaluator;
