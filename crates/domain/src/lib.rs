//! Reqres Domain - Core contract-test types
//!
//! This crate defines the request, response, record, expectation and
//! scenario-state model of the users contract suite.
//! All types here are pure Rust with no I/O dependencies.

pub mod contract;
pub mod error;
pub mod report;
pub mod request;
pub mod response;
pub mod state;
pub mod testing;
pub mod users;

pub use error::{DomainError, DomainResult};
pub use report::{FailureReport, ScenarioReport, StepKind, StepReport, StepStatus, SuiteReport};
pub use request::{HttpMethod, PathTemplate, RequestSpec, ResolvedRequest};
pub use response::{HttpResponse, MappingError, ResponseSpec, map_record};
pub use state::{FailureKind, ScenarioState};
pub use testing::{
    AssertionFailure, AssertionFailures, AssertionResult, ComparisonOperator, Expectation,
    ExpectationSet, StatusExpectation, TestResults,
};
pub use users::{
    SingleUserRecord, SupportInfo, UserListRecord, UserMutationRecord, UserPayload, UserRecord,
};
