//! Scenario and suite reports.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::state::{FailureKind, ScenarioState};

/// What a scenario step does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    /// Prepare scenario data.
    Arrange,
    /// Build and send a request.
    Execute,
    /// Check captured exchanges.
    Check,
}

impl StepKind {
    /// The scenario phase this step runs in.
    #[must_use]
    pub const fn phase(self) -> ScenarioState {
        match self {
            Self::Arrange => ScenarioState::Arranging,
            Self::Execute => ScenarioState::Executing,
            Self::Check => ScenarioState::Asserting,
        }
    }

    /// Returns the kind as a static string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Arrange => "arrange",
            Self::Execute => "execute",
            Self::Check => "check",
        }
    }
}

/// Outcome of one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    /// Step completed.
    Passed,
    /// Step returned an error.
    Failed,
    /// Step did not run because an earlier step failed.
    Skipped,
}

/// Report line for one step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepReport {
    /// Step name.
    pub name: String,
    /// Step kind.
    pub kind: StepKind,
    /// Outcome.
    pub status: StepStatus,
    /// Wall time in milliseconds.
    pub duration_ms: u64,
}

/// Why a scenario failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureReport {
    /// Failing step, or the scenario name for declaration errors.
    pub step: String,
    /// Failure category.
    pub kind: FailureKind,
    /// Full message including request description and response snippet.
    pub message: String,
}

/// Report of one scenario run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioReport {
    /// Unique run identifier.
    pub run_id: Uuid,
    /// Scenario name.
    pub name: String,
    /// Terminal state.
    pub state: ScenarioState,
    /// Start time.
    pub started_at: DateTime<Utc>,
    /// Wall time in milliseconds.
    pub duration_ms: u64,
    /// One entry per declared step.
    pub steps: Vec<StepReport>,
    /// Present when the scenario failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureReport>,
}

impl ScenarioReport {
    /// True when the scenario passed.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.state == ScenarioState::Passed
    }

    /// Failure category, if failed.
    #[must_use]
    pub fn failure_kind(&self) -> Option<FailureKind> {
        self.failure.as_ref().map(|f| f.kind)
    }
}

/// Aggregated report of a suite run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteReport {
    /// Unique run identifier.
    pub run_id: Uuid,
    /// Start time.
    pub started_at: DateTime<Utc>,
    /// Scenario reports in execution order.
    pub scenarios: Vec<ScenarioReport>,
    /// Number of scenarios.
    pub total: usize,
    /// Number of passed scenarios.
    pub passed: usize,
    /// Number of failed scenarios.
    pub failed: usize,
}

impl SuiteReport {
    /// Aggregates scenario reports.
    #[must_use]
    pub fn new(started_at: DateTime<Utc>, scenarios: Vec<ScenarioReport>) -> Self {
        let total = scenarios.len();
        let passed = scenarios.iter().filter(|s| s.passed()).count();
        Self {
            run_id: Uuid::now_v7(),
            started_at,
            scenarios,
            total,
            passed,
            failed: total - passed,
        }
    }

    /// Check if every scenario passed.
    #[must_use]
    pub const fn all_passed(&self) -> bool {
        self.failed == 0
    }

    /// Get pass rate as percentage.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn pass_rate(&self) -> f64 {
        if self.total == 0 {
            100.0
        } else {
            (self.passed as f64 / self.total as f64) * 100.0
        }
    }
}
