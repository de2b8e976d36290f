//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, or `std::process`.
//! `HarnessError` implements `thiserror::Error` and converts to `anyhow::Error`
//! via the `?` operator.

use thiserror::Error;

use crate::domain::lifecycle::HarnessState;

// ── Harness errors ────────────────────────────────────────────────────────────

/// Everything a verification run can fail with.
///
/// Exactly one of these is returned from a failed run. Teardown failures that
/// happen after an earlier failure are logged and recorded in the run report
/// rather than replacing the original error.
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Provisioning failed: {reason}")]
    Provisioning { reason: String },

    #[error("Output '{output}' failed check: expected {expected}, got {value}")]
    Assertion {
        output: String,
        value: String,
        expected: String,
    },

    #[error("Output '{output}' was not produced by the template")]
    MissingOutput { output: String },

    #[error("Teardown failed: {reason}\n\nResources may have leaked. Run 'terraform destroy' in the template directory.")]
    Teardown { reason: String },

    #[error("Invalid harness transition: {from} -> {to}")]
    InvalidTransition { from: HarnessState, to: HarnessState },
}

impl HarnessError {
    /// Stable machine-readable code for JSON output.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG",
            Self::Provisioning { .. } => "PROVISIONING",
            Self::Assertion { .. } => "ASSERTION",
            Self::MissingOutput { .. } => "MISSING_OUTPUT",
            Self::Teardown { .. } => "TEARDOWN",
            Self::InvalidTransition { .. } => "INTERNAL",
        }
    }

    /// Whether this error means an output check did not hold.
    #[must_use]
    pub fn is_assertion_failure(&self) -> bool {
        matches!(self, Self::Assertion { .. } | Self::MissingOutput { .. })
    }
}
