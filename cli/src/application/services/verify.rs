//! Verification use-case: apply a template, check its outputs, tear it down.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//!
//! Once apply has succeeded, `destroy` runs exactly once on every exit path:
//! passing checks, a failed check, a failed output read, or a panicking
//! custom predicate (the panic resumes after teardown). A failed apply is
//! followed by one cleanup `destroy` as well, for partially created resources.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use anyhow::{Context, Result};

use crate::application::ports::{ProgressReporter, ProvisioningEngine};
use crate::domain::{
    CheckOutcome, HarnessError, HarnessFailure, HarnessState, OutputCheck, OutputSet,
    OutputValue, ProvisioningConfig, RunReport, TeardownOutcome,
};

/// Outcome of the check phase.
enum Verdict {
    Passed,
    Failed(HarnessError),
    Panicked(Box<dyn Any + Send>),
}

/// Run one verification: preflight, init + apply, check, destroy.
///
/// # Errors
///
/// Returns a [`HarnessFailure`] carrying exactly one [`HarnessError`] and the
/// full run report. Teardown failures after an earlier error are recorded in
/// the report and logged, not returned.
///
/// # Panics
///
/// Re-raises a panic from a custom predicate once teardown has run.
pub async fn run(
    engine: &impl ProvisioningEngine,
    reporter: &impl ProgressReporter,
    config: &ProvisioningConfig,
    checks: &[OutputCheck],
) -> Result<RunReport, HarnessFailure> {
    let mut report = RunReport::begin(config.template_dir().display().to_string());
    let result = drive(engine, reporter, config, checks, &mut report).await;
    report.finish(result)
}

/// `init` followed by `apply`.
///
/// # Errors
///
/// Returns the first engine error, with the failing step as context.
pub async fn init_and_apply(
    engine: &impl ProvisioningEngine,
    config: &ProvisioningConfig,
) -> Result<()> {
    engine.init(config).await.context("init")?;
    engine.apply(config).await.context("apply")?;
    Ok(())
}

async fn drive(
    engine: &impl ProvisioningEngine,
    reporter: &impl ProgressReporter,
    config: &ProvisioningConfig,
    checks: &[OutputCheck],
    report: &mut RunReport,
) -> Result<(), HarnessError> {
    let dir = config.template_dir().display().to_string();
    let mut state = HarnessState::NotStarted;

    engine
        .preflight(config)
        .await
        .map_err(|e| HarnessError::Config(format!("{e:#}")))?;

    reporter.step(&format!("Applying {dir}..."));
    tracing::info!(template_dir = %dir, vars = config.vars().len(), "apply starting");

    if let Err(e) = init_and_apply(engine, config).await {
        let error = HarnessError::Provisioning {
            reason: format!("{e:#}"),
        };
        tracing::error!(template_dir = %dir, %error, "apply failed, cleaning up partial resources");
        reporter.warn("Apply failed, cleaning up partial resources");
        report.teardown = teardown(engine, reporter, config).await;
        if let TeardownOutcome::Failed { reason } = &report.teardown {
            tracing::warn!(%reason, "cleanup after failed apply also failed");
        }
        advance(&mut state, HarnessState::TornDown, report)?;
        return Err(error);
    }

    tracing::info!(template_dir = %dir, "apply finished");
    reporter.success(&format!("Applied {dir}"));

    let mut verdict = match advance(&mut state, HarnessState::Applied, report) {
        Ok(()) => check_outputs(engine, config, checks, report).await,
        Err(e) => Verdict::Failed(e),
    };
    if matches!(verdict, Verdict::Passed) {
        reporter.success(&format!("{} check(s) passed", report.passed_checks()));
        if let Err(e) = advance(&mut state, HarnessState::Verified, report) {
            verdict = Verdict::Failed(e);
        }
    }

    report.teardown = teardown(engine, reporter, config).await;
    let torn_down = advance(&mut state, HarnessState::TornDown, report);

    match verdict {
        Verdict::Panicked(payload) => panic::resume_unwind(payload),
        Verdict::Failed(error) => {
            if let TeardownOutcome::Failed { reason } = &report.teardown {
                tracing::warn!(%reason, %error, "teardown failed after a failed run");
            }
            Err(error)
        }
        Verdict::Passed => {
            torn_down?;
            match &report.teardown {
                TeardownOutcome::Failed { reason } => Err(HarnessError::Teardown {
                    reason: reason.clone(),
                }),
                TeardownOutcome::Succeeded | TeardownOutcome::NotAttempted => Ok(()),
            }
        }
    }
}

fn advance(
    state: &mut HarnessState,
    next: HarnessState,
    report: &mut RunReport,
) -> Result<(), HarnessError> {
    state.transition(next)?;
    report.state = *state;
    Ok(())
}

async fn check_outputs(
    engine: &impl ProvisioningEngine,
    config: &ProvisioningConfig,
    checks: &[OutputCheck],
    report: &mut RunReport,
) -> Verdict {
    let outputs = match engine.outputs(config).await {
        Ok(outputs) => outputs,
        Err(e) => {
            return Verdict::Failed(HarnessError::Provisioning {
                reason: format!("reading outputs: {e:#}"),
            });
        }
    };
    tracing::debug!(count = outputs.len(), "outputs read");

    let outcomes = &mut report.checks;
    match panic::catch_unwind(AssertUnwindSafe(|| evaluate(&outputs, checks, outcomes))) {
        Ok(Ok(())) => Verdict::Passed,
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "output check failed");
            Verdict::Failed(e)
        }
        Err(payload) => {
            tracing::error!("output predicate panicked, tearing down before re-raising");
            Verdict::Panicked(payload)
        }
    }
}

/// Evaluate checks in order, stopping at the first failure.
fn evaluate(
    outputs: &OutputSet,
    checks: &[OutputCheck],
    outcomes: &mut Vec<CheckOutcome>,
) -> Result<(), HarnessError> {
    for check in checks {
        let result = check.evaluate(outputs);
        outcomes.push(CheckOutcome {
            output: check.output.clone(),
            expected: check.predicate.describe(),
            value: outputs.get(&check.output).map(OutputValue::display),
            passed: result.is_ok(),
        });
        result?;
    }
    Ok(())
}

async fn teardown(
    engine: &impl ProvisioningEngine,
    reporter: &impl ProgressReporter,
    config: &ProvisioningConfig,
) -> TeardownOutcome {
    let dir = config.template_dir().display().to_string();
    reporter.step(&format!("Destroying {dir}..."));
    tracing::info!(template_dir = %dir, "destroy starting");
    match engine.destroy(config).await {
        Ok(()) => {
            tracing::info!(template_dir = %dir, "destroy finished");
            reporter.success(&format!("Destroyed {dir}"));
            TeardownOutcome::Succeeded
        }
        Err(e) => {
            let reason = format!("{e:#}");
            tracing::warn!(template_dir = %dir, %reason, "destroy failed");
            reporter.warn(&format!("Teardown failed: {reason}"));
            TeardownOutcome::Failed { reason }
        }
    }
}
