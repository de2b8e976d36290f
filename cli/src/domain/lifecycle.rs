//! Harness lifecycle state machine.
//!
//! `NotStarted → Applied → Verified → TornDown`, strictly forward. A failed
//! apply goes straight to `TornDown` (partial cleanup) and a failed check
//! skips `Verified`.

use std::fmt;

use serde::Serialize;

use crate::domain::error::HarnessError;

/// Where a single verification run currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HarnessState {
    NotStarted,
    Applied,
    Verified,
    TornDown,
}

impl fmt::Display for HarnessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::NotStarted => "not-started",
            Self::Applied => "applied",
            Self::Verified => "verified",
            Self::TornDown => "torn-down",
        };
        f.write_str(s)
    }
}

impl HarnessState {
    /// Returns `true` if moving from `self` to `next` is allowed.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::NotStarted, Self::Applied | Self::TornDown)
                | (Self::Applied, Self::Verified | Self::TornDown)
                | (Self::Verified, Self::TornDown)
        )
    }

    /// Move to `next`, rejecting anything that is not a forward edge.
    ///
    /// # Errors
    ///
    /// Returns `HarnessError::InvalidTransition` for a disallowed edge.
    pub fn transition(&mut self, next: Self) -> Result<(), HarnessError> {
        if !self.can_transition_to(next) {
            return Err(HarnessError::InvalidTransition {
                from: *self,
                to: next,
            });
        }
        tracing::debug!(from = %self, to = %next, "harness transition");
        *self = next;
        Ok(())
    }

    /// `TornDown` is the only terminal state.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        self == Self::TornDown
    }
}
