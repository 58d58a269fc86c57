//! Reqres Application - Use cases and ports
//!
//! This crate defines the application layer with:
//! - The `HttpClient` port
//! - Request execution against a response spec
//! - The users resource contract (request factories and typed client)
//! - The scenario runner
//! - Application-level error handling

pub mod error;
pub mod execute_request;
pub mod ports;
pub mod scenario;
pub mod users_api;

#[cfg(test)]
mod test_support;

pub use error::{ApplicationError, ApplicationResult};
pub use execute_request::ExecuteRequest;
pub use ports::{HttpClient, HttpClientError};
pub use scenario::{Exchange, Scenario, ScenarioContext, ScenarioRunner, Step};
pub use users_api::{UsersClient, UsersEndpoints, decode};
