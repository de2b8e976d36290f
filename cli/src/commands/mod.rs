//! Command implementations

pub mod run;
pub mod suite;
pub mod version;

use anyhow::Result;

use crate::application::ports::{NoopReporter, ProvisioningEngine};
use crate::application::services::verify;
use crate::domain::{OutputCheck, ProvisioningConfig, RunReport};
use crate::output::{HumanRenderer, OutputContext, TerminalReporter, json};

/// Run one verification and render its report.
///
/// Shared by `run` and `suite`. In JSON mode the report is printed to stdout
/// whether the run passed or not.
///
/// # Errors
///
/// Returns the run's failure after rendering, so the process exits non-zero.
pub async fn execute(
    engine: &impl ProvisioningEngine,
    out: &OutputContext,
    json_mode: bool,
    config: &ProvisioningConfig,
    checks: &[OutputCheck],
) -> Result<RunReport> {
    let result = if json_mode {
        verify::run(engine, &NoopReporter, config, checks).await
    } else {
        let reporter = TerminalReporter::new(out);
        verify::run(engine, &reporter, config, checks).await
    };

    let report = match &result {
        Ok(report) => report,
        Err(failure) => failure.report.as_ref(),
    };
    if json_mode {
        println!("{}", json::format_report(report)?);
    } else {
        HumanRenderer::new(out).render_report(report);
    }

    let report = result?;
    if !json_mode {
        out.success(&format!(
            "{} of {} check(s) passed, resources destroyed",
            report.passed_checks(),
            checks.len()
        ));
    }
    Ok(report)
}
