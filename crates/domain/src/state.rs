//! Scenario execution state machine.
//!
//! A scenario moves `Pending → Arranging → Executing → Asserting` and ends in
//! `Passed` or `Failed`. Phases may be skipped but never re-entered once
//! left, and terminal states are final.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Lifecycle of a single scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioState {
    /// Declared, not started.
    #[default]
    Pending,
    /// Preparing request data.
    Arranging,
    /// Sending requests.
    Executing,
    /// Checking captured responses.
    Asserting,
    /// Every step succeeded.
    Passed,
    /// A step failed; remaining steps were skipped.
    Failed,
}

impl ScenarioState {
    /// Returns true for `Passed` and `Failed`.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Passed | Self::Failed)
    }

    const fn rank(self) -> u8 {
        match self {
            Self::Pending => 0,
            Self::Arranging => 1,
            Self::Executing => 2,
            Self::Asserting => 3,
            Self::Passed | Self::Failed => 4,
        }
    }

    /// Moves to `next`.
    ///
    /// Staying in the current phase is allowed (several steps of one kind);
    /// going back to an earlier phase or leaving a terminal state is not.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTransition` for a disallowed move.
    pub fn advance(self, next: Self) -> DomainResult<Self> {
        let allowed = !self.is_terminal() && (next.is_terminal() || next.rank() >= self.rank());
        if allowed {
            Ok(next)
        } else {
            Err(DomainError::InvalidTransition {
                from: self.to_string(),
                to: next.to_string(),
            })
        }
    }

    /// Returns the state as a static string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Arranging => "arranging",
            Self::Executing => "executing",
            Self::Asserting => "asserting",
            Self::Passed => "passed",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for ScenarioState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Categories of scenario failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Bad template, header, URL, scenario data or step order.
    Configuration,
    /// Connection refused, timeout, DNS failure.
    Transport,
    /// Status code differs from the response spec.
    UnexpectedStatus,
    /// Body does not deserialize into the record.
    Mapping,
    /// An expectation evaluated false.
    Assertion,
}

impl FailureKind {
    /// Returns a human-readable title for this failure kind.
    #[must_use]
    pub const fn title(&self) -> &'static str {
        match self {
            Self::Configuration => "Configuration Error",
            Self::Transport => "Transport Error",
            Self::UnexpectedStatus => "Unexpected Status",
            Self::Mapping => "Mapping Error",
            Self::Assertion => "Assertion Failed",
        }
    }
}
