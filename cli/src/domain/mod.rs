//! Domain layer - pure types, validation, and check evaluation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, or `std::process`.
//! All functions are synchronous and take data in, returning data out.

pub mod check;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod naming;
pub mod output;
pub mod report;
pub mod suite;

pub use check::{OutputCheck, Predicate};
pub use config::{ProvisioningConfig, ProvisioningConfigBuilder, VarValue};
pub use error::HarnessError;
pub use lifecycle::HarnessState;
pub use output::{OutputSet, OutputValue};
pub use report::{CheckOutcome, HarnessFailure, RunReport, TeardownOutcome};
pub use suite::SuiteFile;
