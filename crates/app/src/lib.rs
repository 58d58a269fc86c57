//! Reqres Suite - contract scenarios for the users resource
//!
//! The scenario catalogue and the suite runner used by the `reqres-suite`
//! binary and by the integration tests.

pub mod scenarios;
pub mod suite;

pub use scenarios::{SCENARIO_NAMES, UserScenario, UserScenarioData};
pub use suite::{SuiteError, run_suite};
