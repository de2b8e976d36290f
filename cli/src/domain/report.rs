//! Run report: what happened during one verification run.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::error::HarnessError;
use crate::domain::lifecycle::HarnessState;

/// Result of evaluating a single check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckOutcome {
    pub output: String,
    pub expected: String,
    /// Displayed value, `None` when the output was missing.
    pub value: Option<String>,
    pub passed: bool,
}

/// What happened at teardown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TeardownOutcome {
    NotAttempted,
    Succeeded,
    Failed { reason: String },
}

/// Error summary carried in serialized reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorSummary {
    pub code: String,
    pub message: String,
}

/// Record of one verification run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub template_dir: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub state: HarnessState,
    pub checks: Vec<CheckOutcome>,
    pub teardown: TeardownOutcome,
    pub passed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorSummary>,
}

impl RunReport {
    #[must_use]
    pub fn begin(template_dir: impl Into<String>) -> Self {
        Self {
            template_dir: template_dir.into(),
            started_at: Utc::now(),
            finished_at: None,
            state: HarnessState::NotStarted,
            checks: Vec::new(),
            teardown: TeardownOutcome::NotAttempted,
            passed: false,
            error: None,
        }
    }

    /// Seal the report with the run's result.
    ///
    /// # Errors
    ///
    /// Returns the failure (with this report attached) when `result` is `Err`.
    pub fn finish(mut self, result: Result<(), HarnessError>) -> Result<Self, HarnessFailure> {
        self.finished_at = Some(Utc::now());
        match result {
            Ok(()) => {
                self.passed = true;
                Ok(self)
            }
            Err(error) => {
                self.passed = false;
                self.error = Some(ErrorSummary {
                    code: error.code().to_string(),
                    message: error.to_string(),
                });
                Err(HarnessFailure {
                    error,
                    report: Box::new(self),
                })
            }
        }
    }

    #[must_use]
    pub fn passed_checks(&self) -> usize {
        self.checks.iter().filter(|c| c.passed).count()
    }
}

/// A failed run: the single error that failed it plus the full report.
#[derive(Debug)]
pub struct HarnessFailure {
    pub error: HarnessError,
    pub report: Box<RunReport>,
}

impl fmt::Display for HarnessFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.error.fmt(f)
    }
}

impl std::error::Error for HarnessFailure {}
