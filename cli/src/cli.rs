//! CLI argument parsing with clap derive

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::app::{AppContext, AppFlags};
use crate::commands;
use crate::domain::{HarnessError, HarnessFailure};
use crate::output::json;

/// Provision a Terraform template, check its outputs, tear it down
#[derive(Parser)]
#[command(
    name = "tfverify",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output (any non-empty `NO_COLOR` also disables it)
    #[arg(
        long,
        global = true,
        env = "NO_COLOR",
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Apply a template, check outputs given as flags, destroy
    Run(commands::run::RunArgs),

    /// Apply, check and destroy as described by a YAML suite file
    Suite(commands::suite::SuiteArgs),

    /// Show version
    Version,
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails, including any failed run.
    pub async fn run(self) -> Result<()> {
        let Cli {
            no_color,
            quiet,
            json,
            command,
        } = self;
        let result = match command {
            Command::Version => {
                commands::version::run(json);
                Ok(())
            }
            Command::Run(args) => {
                let app = AppContext::new(&AppFlags { no_color, quiet, json });
                commands::run::run(&app, &args).await
            }
            Command::Suite(args) => {
                let app = AppContext::new(&AppFlags { no_color, quiet, json });
                commands::suite::run(&app, &args).await
            }
        };
        if let (true, Err(err)) = (json, &result) {
            print_json_error(err);
        }
        result
    }
}

/// Print a JSON error object unless a run report was already printed.
fn print_json_error(err: &anyhow::Error) {
    if err.downcast_ref::<HarnessFailure>().is_some() {
        return;
    }
    let code = err
        .chain()
        .find_map(|e| e.downcast_ref::<HarnessError>())
        .map_or("CONFIG", HarnessError::code);
    if let Ok(body) = json::format_error(&format!("{err:#}"), code) {
        println!("{body}");
    }
}
