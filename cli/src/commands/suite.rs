//! `tfverify suite` - config and checks from a YAML suite file.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::infra::suite::YamlSuiteStore;

/// Arguments for the suite command.
#[derive(Args, Debug)]
pub struct SuiteArgs {
    /// Suite file
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

/// Run the suite command.
///
/// # Errors
///
/// Returns an error if the suite cannot be loaded or the run fails.
pub async fn run(app: &AppContext, args: &SuiteArgs) -> Result<()> {
    let (config, checks) = YamlSuiteStore.load(&args.file)?;
    app.output.kv("Suite:", &args.file.display().to_string());
    super::execute(&app.engine, &app.output, app.is_json(), &config, &checks).await?;
    Ok(())
}
