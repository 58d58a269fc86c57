//! Suite report files.

use std::path::{Path, PathBuf};

use reqres_domain::SuiteReport;
use thiserror::Error;
use tokio::fs;

use crate::serialization::{SerializationError, from_json_bytes, to_json_stable};

/// Errors writing or reading a report file.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The report could not be encoded or decoded.
    #[error("report serialization failed: {0}")]
    Serialization(#[from] SerializationError),

    /// The report file does not exist.
    #[error("report not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Any other I/O failure.
    #[error("report I/O error at {}: {source}", .path.display())]
    Io {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}

/// Writes `report` as stable JSON, creating parent directories.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub async fn write_report(path: &Path, report: &SuiteReport) -> Result<(), ReportError> {
    let json = to_json_stable(report)?;
    let io = |source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await.map_err(io)?;
    }
    fs::write(path, json).await.map_err(io)?;

    tracing::info!(path = %path.display(), scenarios = report.total, "report written");
    Ok(())
}

/// Reads a report written by [`write_report`].
///
/// # Errors
///
/// Returns an error if the file is missing or not a report.
pub async fn read_report(path: &Path) -> Result<SuiteReport, ReportError> {
    let bytes = fs::read(path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ReportError::NotFound(path.to_path_buf())
        } else {
            ReportError::Io {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;
    Ok(from_json_bytes(&bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use reqres_domain::{
        FailureKind, FailureReport, ScenarioReport, ScenarioState, StepKind, StepReport,
        StepStatus,
    };

    fn failed_scenario() -> ScenarioReport {
        ScenarioReport {
            run_id: uuid::Uuid::now_v7(),
            name: "delete_user".to_string(),
            state: ScenarioState::Failed,
            started_at: Utc::now(),
            duration_ms: 40,
            steps: vec![
                StepReport {
                    name: "delete user 2".to_string(),
                    kind: StepKind::Execute,
                    status: StepStatus::Failed,
                    duration_ms: 40,
                },
                StepReport {
                    name: "body is empty".to_string(),
                    kind: StepKind::Check,
                    status: StepStatus::Skipped,
                    duration_ms: 0,
                },
            ],
            failure: Some(FailureReport {
                step: "delete user 2".to_string(),
                kind: FailureKind::UnexpectedStatus,
                message: "expected 204, got 500".to_string(),
            }),
        }
    }

    #[tokio::test]
    async fn test_write_and_read_report() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("reports").join("suite.json");
        let report = SuiteReport::new(Utc::now(), vec![failed_scenario()]);

        write_report(&path, &report).await.expect("written");
        let restored = read_report(&path).await.expect("read back");

        assert_eq!(restored, report);
        let text = std::fs::read_to_string(&path).expect("readable");
        assert!(text.contains("\"kind\": \"unexpected_status\""));
        assert!(text.contains("\"status\": \"skipped\""));
    }

    #[tokio::test]
    async fn test_read_missing_report() {
        let dir = tempfile::tempdir().expect("temp dir");
        let result = read_report(&dir.path().join("absent.json")).await;
        assert!(matches!(result, Err(ReportError::NotFound(_))));
    }
}
