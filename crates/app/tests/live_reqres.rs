//! Runs the suite against the live service configured through `REQRES_*`.
//!
//! Needs network access and a valid API key:
//! `REQRES_API_KEY=... cargo test -p reqres-suite --test live_reqres -- --ignored`

#![allow(clippy::expect_used, missing_docs)]

use std::sync::Arc;

use pretty_assertions::assert_eq;
use reqres_application::UsersClient;
use reqres_domain::UserPayload;
use reqres_infrastructure::HarnessConfig;
use reqres_suite::run_suite;

#[tokio::test]
#[ignore = "talks to the live service"]
async fn test_live_suite_passes() {
    let config = HarnessConfig::from_env().expect("config");
    let client = Arc::new(config.http_client().expect("client"));
    let endpoints = config.endpoints().expect("endpoints");

    let report = run_suite(client, endpoints, &[]).await.expect("suite runs");

    for scenario in &report.scenarios {
        if let Some(failure) = &scenario.failure {
            eprintln!("{}: {} ({})", scenario.name, failure.message, failure.step);
        }
    }
    assert!(report.all_passed(), "{} of {} failed", report.failed, report.total);
}

#[tokio::test]
#[ignore = "talks to the live service"]
async fn test_live_client_smoke() {
    let config = HarnessConfig::from_env().expect("config");
    let client = UsersClient::new(
        Arc::new(config.http_client().expect("client")),
        config.endpoints().expect("endpoints"),
    );

    let user = client.get_user(2).await.expect("user 2");
    assert_eq!(user.data.id, Some(2));

    let payload = UserPayload::new("morpheus", "leader");
    let created = client.create_user(&payload).await.expect("created");
    assert!(created.echoes(&payload), "{created:?}");
}
