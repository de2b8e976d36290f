//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain`, never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::process::Output;
use std::time::Duration;

use anyhow::Result;

use crate::domain::{OutputSet, OutputValue, ProvisioningConfig};

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program and capture its output.
    ///
    /// Implementations should delegate to `run_with_timeout` using the
    /// instance's configured default timeout.
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output>;
    /// Run a program with a custom timeout override.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exceeds `timeout`.
    /// On timeout, the child process must be killed (not left orphaned).
    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<Output>;
    /// Run a program with extra environment variables and a custom timeout.
    ///
    /// # Errors
    ///
    /// Same as `run_with_timeout`.
    async fn run_with_env(
        &self,
        program: &str,
        args: &[&str],
        env: &[(&str, &str)],
        timeout: Duration,
    ) -> Result<Output>;
}

// ── Provisioning Engine Port ──────────────────────────────────────────────────

/// The external infrastructure-as-code engine, consumed as a black box.
///
/// Every operation takes the config it acts on; implementations hold no
/// per-run state, so one engine may serve concurrent runs.
#[allow(async_fn_in_trait)]
pub trait ProvisioningEngine {
    /// Check that the engine and template are usable before touching any
    /// infrastructure.
    async fn preflight(&self, config: &ProvisioningConfig) -> Result<()>;
    /// Prepare the working directory (providers, modules, backend).
    async fn init(&self, config: &ProvisioningConfig) -> Result<()>;
    /// Create or update infrastructure to match the template.
    async fn apply(&self, config: &ProvisioningConfig) -> Result<()>;
    /// Read a single named output, `None` if the template has no such output.
    async fn output(&self, config: &ProvisioningConfig, name: &str) -> Result<Option<OutputValue>>;
    /// Read every output in one call.
    async fn outputs(&self, config: &ProvisioningConfig) -> Result<OutputSet>;
    /// Remove everything the template created.
    async fn destroy(&self, config: &ProvisioningConfig) -> Result<()>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait - no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}

/// Reporter that drops every event. Used by library callers and JSON mode.
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn step(&self, _: &str) {}
    fn success(&self, _: &str) {}
    fn warn(&self, _: &str) {}
}
