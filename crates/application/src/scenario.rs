//! Scenario runner
//!
//! A scenario is an ordered list of named steps:
//!
//! - `arrange` prepares scenario data
//! - `execute` builds a request from that data, sends it, verifies the
//!   response against a `ResponseSpec` and captures the exchange
//! - `check` asserts over the captured exchanges
//!
//! Steps run strictly in declared order and each `execute` is awaited before
//! the next step starts. The first failing step aborts the scenario; the
//! remaining steps are reported as skipped. Nothing is retried.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use reqres_domain::{
    FailureReport, HttpResponse, ResolvedRequest, ResponseSpec, ScenarioReport, ScenarioState,
    StepKind, StepReport, StepStatus,
};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::error::{ApplicationError, ApplicationResult};
use crate::execute_request::ExecuteRequest;
use crate::ports::HttpClient;
use crate::users_api::decode;

type ArrangeFn<D> = Box<dyn FnOnce(&mut D) -> ApplicationResult<()> + Send>;
type ExecuteFn<D> = Box<dyn FnOnce(&D) -> ApplicationResult<ResolvedRequest> + Send>;
type CheckFn<D> = Box<dyn FnOnce(&ScenarioContext<D>) -> ApplicationResult<()> + Send>;

enum Action<D> {
    Arrange(ArrangeFn<D>),
    Execute {
        expected: ResponseSpec,
        build: ExecuteFn<D>,
    },
    Check(CheckFn<D>),
}

/// One named step of a scenario.
pub struct Step<D> {
    name: String,
    action: Action<D>,
}

impl<D> Step<D> {
    /// Step name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Step kind.
    #[must_use]
    pub const fn kind(&self) -> StepKind {
        match self.action {
            Action::Arrange(_) => StepKind::Arrange,
            Action::Execute { .. } => StepKind::Execute,
            Action::Check(_) => StepKind::Check,
        }
    }
}

/// A named test case over scenario data `D`.
pub struct Scenario<D> {
    name: String,
    steps: Vec<Step<D>>,
}

impl<D> Scenario<D> {
    /// Creates an empty scenario.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            steps: Vec::new(),
        }
    }

    /// Scenario name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared steps in order.
    #[must_use]
    pub fn steps(&self) -> &[Step<D>] {
        &self.steps
    }

    /// Adds a preparation step.
    #[must_use]
    pub fn arrange<F>(mut self, name: impl Into<String>, step: F) -> Self
    where
        F: FnOnce(&mut D) -> ApplicationResult<()> + Send + 'static,
    {
        self.steps.push(Step {
            name: name.into(),
            action: Action::Arrange(Box::new(step)),
        });
        self
    }

    /// Adds a request step; the response must satisfy `expected`.
    #[must_use]
    pub fn execute<F>(mut self, name: impl Into<String>, expected: ResponseSpec, build: F) -> Self
    where
        F: FnOnce(&D) -> ApplicationResult<ResolvedRequest> + Send + 'static,
    {
        self.steps.push(Step {
            name: name.into(),
            action: Action::Execute {
                expected,
                build: Box::new(build),
            },
        });
        self
    }

    /// Adds an assertion step.
    #[must_use]
    pub fn check<F>(mut self, name: impl Into<String>, step: F) -> Self
    where
        F: FnOnce(&ScenarioContext<D>) -> ApplicationResult<()> + Send + 'static,
    {
        self.steps.push(Step {
            name: name.into(),
            action: Action::Check(Box::new(step)),
        });
        self
    }

    /// Rejects steps declared out of phase order.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Configuration` naming the offending step.
    pub fn validate(&self) -> ApplicationResult<()> {
        let mut state = ScenarioState::Pending;
        for step in &self.steps {
            state = state.advance(step.kind().phase()).map_err(|e| {
                ApplicationError::configuration(format!(
                    "scenario '{}': step '{}' ({}) declared out of order: {e}",
                    self.name,
                    step.name,
                    step.kind().as_str()
                ))
            })?;
        }
        Ok(())
    }
}

/// A request paired with the response it produced.
#[derive(Debug, Clone)]
pub struct Exchange {
    /// Name of the step that sent the request.
    pub step: String,
    /// The request as sent.
    pub request: ResolvedRequest,
    /// The response received.
    pub response: HttpResponse,
}

impl Exchange {
    /// Maps the response body to `T`.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Mapping` naming this request.
    pub fn record<T: DeserializeOwned>(&self) -> ApplicationResult<T> {
        decode(&self.request, &self.response)
    }
}

/// State owned by one running scenario.
#[derive(Debug)]
pub struct ScenarioContext<D> {
    /// Data prepared by arrange steps.
    pub data: D,
    exchanges: Vec<Exchange>,
}

impl<D> ScenarioContext<D> {
    fn new(data: D) -> Self {
        Self {
            data,
            exchanges: Vec::new(),
        }
    }

    /// Captured exchanges in execution order.
    #[must_use]
    pub fn exchanges(&self) -> &[Exchange] {
        &self.exchanges
    }

    /// The exchange captured by the named step.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if no such step ran.
    pub fn exchange(&self, step: &str) -> ApplicationResult<&Exchange> {
        self.exchanges
            .iter()
            .find(|e| e.step == step)
            .ok_or_else(|| ApplicationError::configuration(format!("no exchange for step '{step}'")))
    }

    /// The most recent exchange.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if nothing was sent yet.
    pub fn last_exchange(&self) -> ApplicationResult<&Exchange> {
        self.exchanges
            .last()
            .ok_or_else(|| ApplicationError::configuration("no request has been executed"))
    }

    /// The most recent response.
    ///
    /// # Errors
    ///
    /// See [`Self::last_exchange`].
    pub fn last_response(&self) -> ApplicationResult<&HttpResponse> {
        self.last_exchange().map(|e| &e.response)
    }

    /// The most recent response mapped to `T`.
    ///
    /// # Errors
    ///
    /// A configuration error if nothing was sent, a mapping error if the
    /// body does not fit `T`.
    pub fn last_record<T: DeserializeOwned>(&self) -> ApplicationResult<T> {
        self.last_exchange()?.record()
    }
}

/// Runs scenarios against a shared HTTP client.
pub struct ScenarioRunner<C: HttpClient> {
    execute: ExecuteRequest<C>,
}

impl<C: HttpClient> ScenarioRunner<C> {
    /// Creates a runner sending through `client`.
    pub const fn new(client: Arc<C>) -> Self {
        Self {
            execute: ExecuteRequest::new(client),
        }
    }

    /// Runs `scenario` starting from `D::default()`.
    pub async fn run<D: Default + Send>(&self, scenario: Scenario<D>) -> ScenarioReport {
        self.run_with(scenario, D::default()).await
    }

    /// Runs `scenario` starting from `data`.
    ///
    /// Never fails: every error ends up in the report.
    pub async fn run_with<D: Send>(&self, scenario: Scenario<D>, data: D) -> ScenarioReport {
        let run_id = Uuid::now_v7();
        let started_at = Utc::now();
        let start = Instant::now();
        let Scenario { name, steps } = scenario;
        let total = steps.len();

        tracing::info!(scenario = %name, %run_id, steps = total, "scenario started");

        let mut reports = Vec::with_capacity(total);
        let mut failure = None;
        let mut state = ScenarioState::Pending;

        let order = Scenario {
            name: name.clone(),
            steps,
        };
        let steps = match order.validate() {
            Ok(()) => order.steps,
            Err(error) => {
                failure = Some(FailureReport {
                    step: name.clone(),
                    kind: error.kind(),
                    message: error.to_string(),
                });
                reports.extend(order.steps.iter().map(skipped));
                Vec::new()
            }
        };

        let mut context = ScenarioContext::new(data);
        let mut pending = steps.into_iter();
        for step in pending.by_ref() {
            let kind = step.kind();
            // Order was validated above, so the phase move cannot fail.
            state = state.advance(kind.phase()).unwrap_or(state);
            tracing::debug!(scenario = %name, step = %step.name, kind = kind.as_str(), "step started");

            let step_start = Instant::now();
            let Step { name: step_name, action } = step;
            let outcome = self.perform(action, &step_name, &mut context).await;
            let duration_ms = elapsed_ms(step_start);

            match outcome {
                Ok(()) => reports.push(StepReport {
                    name: step_name,
                    kind,
                    status: StepStatus::Passed,
                    duration_ms,
                }),
                Err(error) => {
                    tracing::warn!(
                        scenario = %name,
                        step = %step_name,
                        kind = ?error.kind(),
                        error = %error,
                        "step failed"
                    );
                    failure = Some(FailureReport {
                        step: step_name.clone(),
                        kind: error.kind(),
                        message: error.to_string(),
                    });
                    reports.push(StepReport {
                        name: step_name,
                        kind,
                        status: StepStatus::Failed,
                        duration_ms,
                    });
                    break;
                }
            }
        }
        reports.extend(pending.as_slice().iter().map(skipped));

        let terminal = if failure.is_some() {
            ScenarioState::Failed
        } else {
            ScenarioState::Passed
        };
        let state = state.advance(terminal).unwrap_or(terminal);
        let duration_ms = elapsed_ms(start);

        tracing::info!(scenario = %name, %run_id, state = %state, duration_ms, "scenario finished");

        ScenarioReport {
            run_id,
            name,
            state,
            started_at,
            duration_ms,
            steps: reports,
            failure,
        }
    }

    async fn perform<D: Send>(
        &self,
        action: Action<D>,
        step: &str,
        context: &mut ScenarioContext<D>,
    ) -> ApplicationResult<()> {
        match action {
            Action::Arrange(arrange) => arrange(&mut context.data),
            Action::Execute { expected, build } => {
                let request = build(&context.data)?;
                let response = self.execute.execute(&request, &expected).await?;
                context.exchanges.push(Exchange {
                    step: step.to_string(),
                    request,
                    response,
                });
                Ok(())
            }
            Action::Check(check) => check(context),
        }
    }
}

fn skipped<D>(step: &Step<D>) -> StepReport {
    StepReport {
        name: step.name.clone(),
        kind: step.kind(),
        status: StepStatus::Skipped,
        duration_ms: 0,
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}
