//! Terminal and JSON rendering for run reports.

pub mod human;
pub mod json;
pub mod progress;
pub mod reporter;
pub mod styles;

use console::Term;
use owo_colors::{OwoColorize as _, Style};
pub use human::HumanRenderer;
pub use reporter::TerminalReporter;
pub use styles::Styles;

/// Styling and terminal state shared by every renderer.
pub struct OutputContext {
    /// Active stylesheet; plain when color is off.
    pub styles: Styles,
    /// Whether stdout is a TTY.
    pub is_tty: bool,
    /// Suppress everything except the final error.
    pub quiet: bool,
}

impl OutputContext {
    /// Build from the global flags. Color also needs a TTY and no `NO_COLOR`.
    #[must_use]
    pub fn new(no_color: bool, quiet: bool) -> Self {
        let is_tty = Term::stdout().is_term();
        let styles = if !no_color && is_tty && std::env::var_os("NO_COLOR").is_none() {
            Styles::colored()
        } else {
            Styles::plain()
        };
        Self {
            styles,
            is_tty,
            quiet,
        }
    }

    /// Spinners only make sense on an interactive, non-quiet terminal.
    #[must_use]
    pub fn show_progress(&self) -> bool {
        self.is_tty && !self.quiet
    }

    fn line(&self, glyph: &str, style: Style, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", glyph.style(style));
        }
    }

    pub fn success(&self, msg: &str) {
        self.line("✓", self.styles.pass, msg);
    }

    pub fn warn(&self, msg: &str) {
        self.line("⚠", self.styles.teardown, msg);
    }

    pub fn info(&self, msg: &str) {
        self.line("ℹ", self.styles.step, msg);
    }

    pub fn header(&self, msg: &str) {
        if !self.quiet {
            println!("  {}", msg.style(self.styles.title));
        }
    }

    /// Key dimmed, value plain.
    pub fn kv(&self, key: &str, value: &str) {
        if !self.quiet {
            println!("  {}  {value}", key.style(self.styles.label));
        }
    }
}
