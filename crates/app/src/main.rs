//! Reqres Suite - Main Entry Point
//!
//! Runs the users contract scenarios against the configured service and
//! exits non-zero if any of them failed.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use reqres_domain::SuiteReport;
use reqres_infrastructure::{HarnessConfig, init_tracing, write_report};
use reqres_suite::{SCENARIO_NAMES, run_suite};

/// Contract tests for the reqres.in users API.
///
/// Endpoint and client settings come from `REQRES_BASE_URI`,
/// `REQRES_BASE_PATH`, `REQRES_API_KEY`, `REQRES_TIMEOUT_MS` and
/// `REQRES_USER_AGENT`.
#[derive(Debug, Parser)]
#[command(name = "reqres-suite", version, about)]
struct Cli {
    /// Run only this scenario (repeatable)
    #[arg(long = "scenario", value_name = "NAME")]
    scenarios: Vec<String>,

    /// List scenario names and exit
    #[arg(long)]
    list: bool,

    /// Write a JSON report to this path
    #[arg(long, value_name = "PATH")]
    report: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.list {
        for name in SCENARIO_NAMES {
            println!("{name}");
        }
        return Ok(ExitCode::SUCCESS);
    }

    init_tracing()?;

    let config = HarnessConfig::from_env()?;
    tracing::info!(
        base_uri = %config.base_uri,
        "Starting reqres-suite v{}",
        env!("CARGO_PKG_VERSION")
    );

    let client = Arc::new(config.http_client()?);
    let report = run_suite(client, config.endpoints()?, &cli.scenarios).await?;

    print_summary(&report);

    if let Some(path) = &cli.report {
        write_report(path, &report).await?;
    }

    Ok(if report.all_passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn print_summary(report: &SuiteReport) {
    for scenario in &report.scenarios {
        let verdict = if scenario.passed() { "PASS" } else { "FAIL" };
        println!("{verdict} {} ({} ms)", scenario.name, scenario.duration_ms);
        if let Some(failure) = &scenario.failure {
            println!("     {} in '{}': {}", failure.kind.title(), failure.step, failure.message);
        }
    }
    println!(
        "{} scenarios, {} passed, {} failed ({:.0}%)",
        report.total,
        report.passed,
        report.failed,
        report.pass_rate()
    );
}
