//! Infrastructure implementation of the `ProvisioningEngine` port.
//!
//! `TerraformEngine<R>` routes all terraform CLI calls through a
//! `CommandRunner`. Every call uses `-chdir=<template_dir>` so the process
//! working directory never matters.

use std::process::Output;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::application::ports::{CommandRunner, ProvisioningEngine};
use crate::domain::{OutputSet, OutputValue, ProvisioningConfig};
use crate::infra::command_runner::{
    DEFAULT_CMD_TIMEOUT, DEFAULT_PROVISION_TIMEOUT, TokioCommandRunner,
};

/// Environment variable overriding the engine binary (e.g. `tofu`).
pub const TERRAFORM_BIN_ENV: &str = "TFVERIFY_TERRAFORM_BIN";

/// Binary used when `TFVERIFY_TERRAFORM_BIN` is unset.
pub const DEFAULT_TERRAFORM_BIN: &str = "terraform";

/// Set on every invocation so terraform never prompts or prints
/// "next steps" hints.
const AUTOMATION_ENV: [(&str, &str); 2] = [("TF_IN_AUTOMATION", "1"), ("TF_INPUT", "0")];

/// Infrastructure adapter that drives the terraform CLI.
///
/// Generic over `R: CommandRunner` so that tests can inject a mock runner
/// without spawning real processes.
pub struct TerraformEngine<R: CommandRunner> {
    runner: R,
    binary: String,
    cmd_timeout: Duration,
    provision_timeout: Duration,
}

impl<R: CommandRunner> TerraformEngine<R> {
    /// Create an engine with an explicit runner and binary.
    pub fn new(runner: R, binary: impl Into<String>) -> Self {
        Self {
            runner,
            binary: binary.into(),
            cmd_timeout: DEFAULT_CMD_TIMEOUT,
            provision_timeout: DEFAULT_PROVISION_TIMEOUT,
        }
    }

    /// Override the timeout for init/apply/destroy.
    #[must_use]
    pub fn with_provision_timeout(mut self, timeout: Duration) -> Self {
        self.provision_timeout = timeout;
        self
    }

    /// Version string reported by `terraform version`, first line only.
    ///
    /// # Errors
    ///
    /// Returns an error if the binary cannot be run or exits non-zero.
    pub async fn version(&self) -> Result<String> {
        let output = self
            .runner
            .run_with_timeout(&self.binary, &["version"], self.cmd_timeout)
            .await
            .with_context(|| format!("{} version", self.binary))?;
        anyhow::ensure!(
            output.status.success(),
            "{} version failed: {}",
            self.binary,
            stderr_of(&output)
        );
        Ok(String::from_utf8_lossy(&output.stdout)
            .lines()
            .next()
            .unwrap_or_default()
            .trim()
            .to_string())
    }

    /// Run `terraform -chdir=<dir> <step> <args>` without checking the exit status.
    async fn invoke(
        &self,
        config: &ProvisioningConfig,
        step: &str,
        args: &[String],
        timeout: Duration,
    ) -> Result<Output> {
        let chdir = format!("-chdir={}", config.template_dir().display());
        let mut argv: Vec<&str> = vec![chdir.as_str(), step];
        argv.extend(args.iter().map(String::as_str));

        let mut env: Vec<(&str, &str)> = AUTOMATION_ENV.to_vec();
        env.extend(config.env().iter().map(|(k, v)| (k.as_str(), v.as_str())));

        self.runner
            .run_with_env(&self.binary, &argv, &env, timeout)
            .await
            .with_context(|| format!("terraform {step}"))
    }

    /// Like `invoke`, but a non-zero exit is an error carrying stderr.
    async fn exec(
        &self,
        config: &ProvisioningConfig,
        step: &str,
        args: &[String],
        timeout: Duration,
    ) -> Result<Output> {
        let output = self.invoke(config, step, args, timeout).await?;
        anyhow::ensure!(
            output.status.success(),
            "terraform {step} failed ({}): {}",
            output.status,
            stderr_of(&output)
        );
        Ok(output)
    }
}

impl TerraformEngine<TokioCommandRunner> {
    /// Production engine: binary from `TFVERIFY_TERRAFORM_BIN`, else `terraform`.
    #[must_use]
    pub fn default_runner() -> Self {
        let binary =
            std::env::var(TERRAFORM_BIN_ENV).unwrap_or_else(|_| DEFAULT_TERRAFORM_BIN.to_string());
        Self::new(TokioCommandRunner::new(DEFAULT_CMD_TIMEOUT), binary)
    }
}

/// Flags shared by apply and destroy.
///
/// `-chdir` switches directory before terraform reads `-var-file`, so var
/// files are made absolute against our own working directory first.
fn mutate_args(config: &ProvisioningConfig) -> Result<Vec<String>> {
    let mut args = vec!["-input=false".to_string(), "-auto-approve".to_string()];
    if config.no_color() {
        args.push("-no-color".to_string());
    }
    if !config.lock() {
        args.push("-lock=false".to_string());
    }
    for file in config.var_files() {
        let path = std::path::absolute(file)
            .with_context(|| format!("resolving var file {}", file.display()))?;
        args.push(format!("-var-file={}", path.display()));
    }
    args.extend(config.var_args());
    Ok(args)
}

fn stderr_of(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        "(no stderr)".to_string()
    } else {
        trimmed.to_string()
    }
}

impl<R: CommandRunner> ProvisioningEngine for TerraformEngine<R> {
    async fn preflight(&self, config: &ProvisioningConfig) -> Result<()> {
        let dir = config.template_dir();
        let meta = tokio::fs::metadata(dir)
            .await
            .with_context(|| format!("template directory {} not found", dir.display()))?;
        anyhow::ensure!(meta.is_dir(), "{} is not a directory", dir.display());

        let version = self
            .version()
            .await
            .with_context(|| format!("engine binary '{}' is not usable", self.binary))?;
        tracing::debug!(binary = %self.binary, %version, "engine available");
        Ok(())
    }

    async fn init(&self, config: &ProvisioningConfig) -> Result<()> {
        let mut args = vec!["-input=false".to_string()];
        if config.no_color() {
            args.push("-no-color".to_string());
        }
        if config.upgrade() {
            args.push("-upgrade".to_string());
        }
        self.exec(config, "init", &args, self.provision_timeout)
            .await?;
        Ok(())
    }

    async fn apply(&self, config: &ProvisioningConfig) -> Result<()> {
        self.exec(config, "apply", &mutate_args(config)?, self.provision_timeout)
            .await?;
        Ok(())
    }

    /// Read through the full document: `output -json <name>` prints the bare
    /// value and drops the `sensitive` marker.
    async fn output(&self, config: &ProvisioningConfig, name: &str) -> Result<Option<OutputValue>> {
        Ok(self.outputs(config).await?.remove(name))
    }

    async fn outputs(&self, config: &ProvisioningConfig) -> Result<OutputSet> {
        let args = ["-no-color".to_string(), "-json".to_string()];
        let output = self
            .exec(config, "output", &args, self.cmd_timeout)
            .await?;
        OutputSet::from_json(&output.stdout)
    }

    async fn destroy(&self, config: &ProvisioningConfig) -> Result<()> {
        self.exec(config, "destroy", &mutate_args(config)?, self.provision_timeout)
            .await?;
        Ok(())
    }
}
