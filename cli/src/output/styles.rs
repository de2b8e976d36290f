//! Color roles for run output.

use owo_colors::Style;

/// One style per thing a run prints, so the palette lives in one place.
#[derive(Debug, Default, Clone, Copy)]
pub struct Styles {
    /// A check that held, a finished apply or destroy.
    pub pass: Style,
    /// A check that did not hold.
    pub fail: Style,
    /// Teardown trouble and cleanup after a failed apply.
    pub teardown: Style,
    /// An engine step still running.
    pub step: Style,
    /// Output names in the check table.
    pub output: Style,
    /// Keys of `key  value` lines.
    pub label: Style,
    /// Section titles.
    pub title: Style,
}

impl Styles {
    /// No escapes at all; used without a TTY or with `NO_COLOR`.
    #[must_use]
    pub fn plain() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn colored() -> Self {
        Self {
            pass: Style::new().green(),
            fail: Style::new().red().bold(),
            teardown: Style::new().yellow(),
            step: Style::new().cyan(),
            output: Style::new().bold(),
            label: Style::new().dimmed(),
            title: Style::new().bold().underline(),
        }
    }
}
