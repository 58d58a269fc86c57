//! Runs a selection of the catalogue and aggregates the reports.

use std::sync::Arc;

use chrono::Utc;
use reqres_application::{HttpClient, ScenarioRunner, UsersEndpoints};
use reqres_domain::SuiteReport;
use thiserror::Error;

use crate::scenarios::{self, SCENARIO_NAMES};

/// Errors selecting scenarios.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SuiteError {
    /// A requested scenario is not in the catalogue.
    #[error("unknown scenario '{name}' (known: {known})")]
    UnknownScenario {
        /// Requested name.
        name: String,
        /// Comma-separated catalogue.
        known: String,
    },
}

/// Runs the named scenarios, or the whole catalogue when `selected` is empty.
///
/// Scenarios run one after another in catalogue order. A failing scenario
/// does not stop the others.
///
/// # Errors
///
/// Returns `SuiteError::UnknownScenario` before anything runs if a name is
/// not in the catalogue.
pub async fn run_suite<C: HttpClient>(
    client: Arc<C>,
    endpoints: UsersEndpoints,
    selected: &[String],
) -> Result<SuiteReport, SuiteError> {
    if let Some(name) = selected
        .iter()
        .find(|name| !SCENARIO_NAMES.contains(&name.as_str()))
    {
        return Err(SuiteError::UnknownScenario {
            name: name.clone(),
            known: SCENARIO_NAMES.join(", "),
        });
    }

    let endpoints = Arc::new(endpoints);
    let runner = ScenarioRunner::new(client);
    let started_at = Utc::now();
    let mut reports = Vec::new();

    for name in SCENARIO_NAMES
        .iter()
        .filter(|name| selected.is_empty() || selected.iter().any(|s| s == **name))
    {
        if let Some(scenario) = scenarios::build(name, &endpoints) {
            reports.push(runner.run(scenario).await);
        }
    }

    let report = SuiteReport::new(started_at, reports);
    tracing::info!(
        total = report.total,
        passed = report.passed,
        failed = report.failed,
        "suite finished"
    );
    Ok(report)
}
