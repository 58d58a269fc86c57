//! The users contract scenarios.
//!
//! Every scenario is built from shared request factories and runs over
//! [`UserScenarioData`]. Checks go through the expectation evaluator so a
//! failure names the field path, the expected condition and the actual value.

use std::sync::Arc;

use std::fmt::Display;

use reqres_application::{
    ApplicationError, ApplicationResult, Scenario, ScenarioContext, UsersEndpoints,
    users_api::{created_spec, deleted_spec, missing_spec, read_spec, updated_spec},
};
use reqres_domain::{
    AssertionFailure, AssertionFailures, Expectation, ExpectationSet, SingleUserRecord,
    UserListRecord, UserMutationRecord, UserPayload, contract::ISO_TIMESTAMP_PATTERN,
};
use reqres_infrastructure::ExpectationEvaluator;

/// Page requested by the list scenario.
pub const LIST_PAGE: u32 = 2;

/// Existing user used by read, update and delete scenarios.
pub const EXISTING_USER_ID: u64 = 2;

/// User id the service does not know.
pub const UNKNOWN_USER_ID: u64 = 23;

/// Scenario names, in run order.
pub const SCENARIO_NAMES: [&str; 8] = [
    "users_list",
    "single_user",
    "single_user_not_found",
    "create_user",
    "update_user_patch",
    "update_user_put",
    "delete_user",
    "get_user_idempotent",
];

/// Data prepared by arrange steps.
#[derive(Debug, Clone, Default)]
pub struct UserScenarioData {
    /// Body sent by create and update.
    pub payload: Option<UserPayload>,
}

impl UserScenarioData {
    /// The arranged payload.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if no arrange step set it.
    pub fn payload(&self) -> ApplicationResult<&UserPayload> {
        self.payload
            .as_ref()
            .ok_or_else(|| ApplicationError::configuration("payload was not arranged"))
    }
}

/// A scenario of the users suite.
pub type UserScenario = Scenario<UserScenarioData>;

/// Builds the scenario called `name`.
#[must_use]
pub fn build(name: &str, endpoints: &Arc<UsersEndpoints>) -> Option<UserScenario> {
    let endpoints = Arc::clone(endpoints);
    let scenario = match name {
        "users_list" => users_list(endpoints),
        "single_user" => single_user(endpoints),
        "single_user_not_found" => single_user_not_found(endpoints),
        "create_user" => create_user(endpoints),
        "update_user_patch" => update_user(endpoints, UpdateKind::Patch),
        "update_user_put" => update_user(endpoints, UpdateKind::Put),
        "delete_user" => delete_user(endpoints),
        "get_user_idempotent" => get_user_idempotent(endpoints),
        _ => return None,
    };
    Some(scenario)
}

/// Builds every scenario in [`SCENARIO_NAMES`] order.
#[must_use]
pub fn all(endpoints: &Arc<UsersEndpoints>) -> Vec<UserScenario> {
    SCENARIO_NAMES
        .iter()
        .filter_map(|name| build(name, endpoints))
        .collect()
}

fn users_list(endpoints: Arc<UsersEndpoints>) -> UserScenario {
    UserScenario::new("users_list")
        .execute(format!("list page {LIST_PAGE}"), read_spec(), move |_| {
            endpoints.list_users(LIST_PAGE)
        })
        .check("page holds users", |ctx| {
            let page: UserListRecord = ctx.last_record()?;
            let set = ExpectationSet::new("users list")
                .with(Expectation::field_equals("$.page", LIST_PAGE))
                .with(Expectation::collection_not_empty("$.data"));
            ExpectationEvaluator::new().check_record(&set, &page)?;
            invariant(
                "users list",
                page.fits_page(),
                "$.data",
                format!("at most {} users", page.per_page),
                page.data.len(),
            )
        })
}

fn single_user(endpoints: Arc<UsersEndpoints>) -> UserScenario {
    UserScenario::new("single_user")
        .execute(
            format!("get user {EXISTING_USER_ID}"),
            read_spec(),
            move |_| endpoints.get_user(EXISTING_USER_ID),
        )
        .check("user matches id", |ctx| {
            let user: SingleUserRecord = ctx.last_record()?;
            let set = ExpectationSet::new("single user")
                .with(Expectation::field_equals("$.data.id", EXISTING_USER_ID));
            ExpectationEvaluator::new().check_record(&set, &user)?;
            invariant(
                "single user",
                user.data.has_well_formed_email(),
                "$.data.email",
                "an address containing '@' and '.'",
                user.data.email.as_deref().unwrap_or("<absent>"),
            )
        })
}

fn single_user_not_found(endpoints: Arc<UsersEndpoints>) -> UserScenario {
    UserScenario::new("single_user_not_found")
        .execute(
            format!("get user {UNKNOWN_USER_ID}"),
            missing_spec(),
            move |_| endpoints.get_user(UNKNOWN_USER_ID),
        )
        .check("status is not found", |ctx| {
            let set = ExpectationSet::new("unknown user")
                .with(Expectation::status(reqres_domain::contract::STATUS_NOT_FOUND));
            ExpectationEvaluator::new().check_response(&set, ctx.last_response()?)?;
            Ok(())
        })
}

fn create_user(endpoints: Arc<UsersEndpoints>) -> UserScenario {
    UserScenario::new("create_user")
        .arrange("payload morpheus", |data: &mut UserScenarioData| {
            data.payload = Some(UserPayload::new("morpheus", "leader"));
            Ok(())
        })
        .execute("create user", created_spec(), move |data| {
            endpoints.create_user(data.payload()?)
        })
        .check("user was created", |ctx| {
            let created: UserMutationRecord = ctx.last_record()?;
            let set = ExpectationSet::new("created user").with(Expectation::field_not_blank("$.id"));
            ExpectationEvaluator::new().check_record(&set, &created)?;
            invariant(
                "created user",
                created.has_iso_created_at(),
                "$.createdAt",
                format!("a timestamp matching {ISO_TIMESTAMP_PATTERN}"),
                created.created_at.as_deref().unwrap_or("<absent>"),
            )?;
            check_echo("created user", ctx, &created)
        })
}

#[derive(Debug, Clone, Copy)]
enum UpdateKind {
    Patch,
    Put,
}

fn update_user(endpoints: Arc<UsersEndpoints>, kind: UpdateKind) -> UserScenario {
    let (name, step) = match kind {
        UpdateKind::Patch => ("update_user_patch", "patch user"),
        UpdateKind::Put => ("update_user_put", "put user"),
    };
    UserScenario::new(name)
        .arrange("payload neo", |data: &mut UserScenarioData| {
            data.payload = Some(UserPayload::new("neo", "the one"));
            Ok(())
        })
        .execute(
            format!("{step} {EXISTING_USER_ID}"),
            updated_spec(),
            move |data| {
                let payload = data.payload()?;
                match kind {
                    UpdateKind::Patch => endpoints.patch_user(EXISTING_USER_ID, payload),
                    UpdateKind::Put => endpoints.put_user(EXISTING_USER_ID, payload),
                }
            },
        )
        .check("fields are echoed", |ctx| {
            let updated: UserMutationRecord = ctx.last_record()?;
            let set =
                ExpectationSet::new("updated user").with(Expectation::field_not_blank("$.updatedAt"));
            ExpectationEvaluator::new().check_record(&set, &updated)?;
            check_echo("updated user", ctx, &updated)
        })
}

fn delete_user(endpoints: Arc<UsersEndpoints>) -> UserScenario {
    UserScenario::new("delete_user")
        .execute(
            format!("delete user {EXISTING_USER_ID}"),
            deleted_spec(),
            move |_| endpoints.delete_user(EXISTING_USER_ID),
        )
        .check("body is empty", |ctx| {
            let set = ExpectationSet::new("deleted user").with(Expectation::BodyEmpty);
            ExpectationEvaluator::new().check_response(&set, ctx.last_response()?)?;
            Ok(())
        })
}

fn get_user_idempotent(endpoints: Arc<UsersEndpoints>) -> UserScenario {
    let again = Arc::clone(&endpoints);
    UserScenario::new("get_user_idempotent")
        .execute("first get", read_spec(), move |_| {
            endpoints.get_user(EXISTING_USER_ID)
        })
        .execute("second get", read_spec(), move |_| {
            again.get_user(EXISTING_USER_ID)
        })
        .check("records are equal", |ctx| {
            let first: SingleUserRecord = ctx.exchange("first get")?.record()?;
            let second: SingleUserRecord = ctx.exchange("second get")?.record()?;
            let expected = serde_json::to_value(&first)
                .map_err(|e| ApplicationError::configuration(e.to_string()))?;
            let set = ExpectationSet::new("repeated get").with(Expectation::field_equals("$", expected));
            ExpectationEvaluator::new().check_record(&set, &second)?;
            Ok(())
        })
}

/// Name and job must equal the arranged payload.
fn check_echo(
    set: &str,
    ctx: &ScenarioContext<UserScenarioData>,
    record: &UserMutationRecord,
) -> ApplicationResult<()> {
    let payload = ctx.data.payload()?;
    invariant(
        set,
        record.echoes(payload),
        "$",
        format!("name '{}' and job '{}'", payload.name, payload.job),
        format!("name '{}' and job '{}'", record.name, record.job),
    )
}

/// Fails with a single assertion failure unless `holds`.
fn invariant(
    set: &str,
    holds: bool,
    path: &str,
    expected: impl Display,
    actual: impl Display,
) -> ApplicationResult<()> {
    if holds {
        return Ok(());
    }
    let failure = AssertionFailure {
        path: path.to_string(),
        expected: expected.to_string(),
        actual: actual.to_string(),
        message: format!("{set} violates its record invariant"),
    };
    Err(ApplicationError::from(AssertionFailures {
        set: set.to_string(),
        failures: vec![failure],
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use reqres_domain::{RequestSpec, StepKind};

    fn endpoints() -> Arc<UsersEndpoints> {
        Arc::new(
            UsersEndpoints::new(RequestSpec::new("test", "http://127.0.0.1:1"), "key")
                .expect("valid endpoints"),
        )
    }

    #[test]
    fn test_catalogue_is_complete_and_ordered() {
        let scenarios = all(&endpoints());
        let names: Vec<_> = scenarios.iter().map(Scenario::name).collect();
        assert_eq!(names, SCENARIO_NAMES.to_vec());
        for scenario in &scenarios {
            assert!(scenario.validate().is_ok(), "{} out of order", scenario.name());
        }
    }

    #[test]
    fn test_unknown_scenario() {
        assert!(build("drop_database", &endpoints()).is_none());
    }

    #[test]
    fn test_create_user_steps() {
        let scenario = build("create_user", &endpoints()).expect("known");
        let kinds: Vec<_> = scenario.steps().iter().map(|s| s.kind()).collect();
        assert_eq!(kinds, vec![StepKind::Arrange, StepKind::Execute, StepKind::Check]);
    }

    #[test]
    fn test_broken_invariant_is_assertion_error() {
        assert!(invariant("list", true, "$.data", "x", "y").is_ok());

        let error = invariant("list", false, "$.data", "at most 6 users", 7).expect_err("broken");
        assert_eq!(error.kind(), reqres_domain::FailureKind::Assertion);
        let ApplicationError::Assertion(failures) = error else {
            panic!("expected an assertion error");
        };
        assert_eq!(failures.failures[0].path, "$.data");
        assert_eq!(failures.failures[0].actual, "7");
    }

    #[test]
    fn test_missing_payload_is_configuration_error() {
        let error = UserScenarioData::default().payload().expect_err("not arranged");
        assert_eq!(error.kind(), reqres_domain::FailureKind::Configuration);
    }
}
