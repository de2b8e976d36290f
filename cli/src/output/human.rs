//! Human-readable terminal renderer.

use owo_colors::OwoColorize as _;

use crate::domain::{RunReport, TeardownOutcome};
use crate::output::OutputContext;

/// Renders run reports as human-readable terminal output using `OutputContext`.
pub struct HumanRenderer<'a> {
    ctx: &'a OutputContext,
}

impl<'a> HumanRenderer<'a> {
    /// Create a new `HumanRenderer` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }

    /// Render the per-check table and teardown line of a finished run.
    pub fn render_report(&self, report: &RunReport) {
        if self.ctx.quiet {
            return;
        }
        println!();
        self.ctx.header(&format!("Checks ({}):", report.template_dir));
        if report.checks.is_empty() {
            self.ctx.info("No checks evaluated");
        }
        for check in &report.checks {
            let value = check.value.as_deref().unwrap_or("(missing)");
            if check.passed {
                self.ctx
                    .success(&format!("{} = {value}", check.output.style(self.ctx.styles.output)));
            } else {
                println!(
                    "  {} {} = {value}, expected {}",
                    "✗".style(self.ctx.styles.fail),
                    check.output.style(self.ctx.styles.output),
                    check.expected
                );
            }
        }

        match &report.teardown {
            TeardownOutcome::Succeeded => self.ctx.kv("Teardown:", "destroyed"),
            TeardownOutcome::NotAttempted => self.ctx.kv("Teardown:", "not attempted"),
            TeardownOutcome::Failed { reason } => self.ctx.warn(&format!("Teardown failed: {reason}")),
        }
        if let Some(finished) = report.finished_at {
            let secs = (finished - report.started_at).num_seconds();
            self.ctx.kv("Duration:", &format_duration(secs));
        }
    }
}

/// Format seconds as `1h 2m 3s`, dropping leading zero units.
#[must_use]
pub fn format_duration(total_secs: i64) -> String {
    let total = total_secs.max(0);
    let (h, m, s) = (total / 3600, (total % 3600) / 60, total % 60);
    match (h, m) {
        (0, 0) => format!("{s}s"),
        (0, _) => format!("{m}m {s}s"),
        _ => format!("{h}h {m}m {s}s"),
    }
}
