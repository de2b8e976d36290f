//! `tfverify run` - checks given as flags.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::domain::config::parse_key_value;
use crate::domain::{HarnessError, OutputCheck, Predicate, ProvisioningConfig};

/// Arguments for the run command.
#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Template directory
    #[arg(long, short = 'd', value_name = "DIR")]
    pub dir: PathBuf,

    /// Input variable (repeatable)
    #[arg(long = "var", value_name = "NAME=VALUE")]
    pub vars: Vec<String>,

    /// Variable definitions file (repeatable)
    #[arg(long = "var-file", value_name = "FILE")]
    pub var_files: Vec<PathBuf>,

    /// Extra environment for terraform, e.g. ARM_SUBSCRIPTION_ID (repeatable)
    #[arg(long = "env", value_name = "NAME=VALUE")]
    pub env: Vec<String>,

    /// Output that must be non-empty (repeatable)
    #[arg(long = "not-empty", value_name = "OUTPUT")]
    pub not_empty: Vec<String>,

    /// Output that must equal a value (repeatable)
    #[arg(long = "equals", value_name = "OUTPUT=VALUE")]
    pub equals: Vec<String>,

    /// Output that must match a regex (repeatable)
    #[arg(long = "matches", value_name = "OUTPUT=REGEX")]
    pub matches: Vec<String>,

    /// Upgrade providers and modules during init
    #[arg(long)]
    pub upgrade: bool,

    /// Do not hold a state lock
    #[arg(long)]
    pub no_lock: bool,
}

impl RunArgs {
    /// Build the config and checks.
    ///
    /// Checks run in flag-kind order: every `--not-empty`, then `--equals`,
    /// then `--matches`, each in the order given.
    ///
    /// # Errors
    ///
    /// Returns `HarnessError::Config` for malformed pairs, bad variable names
    /// or invalid regexes.
    pub fn to_parts(&self) -> Result<(ProvisioningConfig, Vec<OutputCheck>), HarnessError> {
        let mut builder = ProvisioningConfig::builder(&self.dir)
            .upgrade(self.upgrade)
            .lock(!self.no_lock);
        for pair in &self.vars {
            let (name, value) = parse_key_value(pair)?;
            builder = builder.var(name, value);
        }
        for pair in &self.env {
            let (name, value) = parse_key_value(pair)?;
            builder = builder.env(name, value);
        }
        for file in &self.var_files {
            builder = builder.var_file(file);
        }

        let mut checks: Vec<OutputCheck> =
            self.not_empty.iter().map(OutputCheck::not_empty).collect();
        for pair in &self.equals {
            let (output, expected) = parse_key_value(pair)?;
            checks.push(OutputCheck::equals(output, expected));
        }
        for pair in &self.matches {
            let (output, pattern) = parse_key_value(pair)?;
            checks.push(OutputCheck::new(output, Predicate::matches(&pattern)?));
        }

        Ok((builder.build()?, checks))
    }
}

/// Run the run command.
///
/// # Errors
///
/// Returns an error if the arguments are invalid or the run fails.
pub async fn run(app: &AppContext, args: &RunArgs) -> Result<()> {
    let (config, checks) = args.to_parts()?;
    super::execute(&app.engine, &app.output, app.is_json(), &config, &checks).await?;
    Ok(())
}
