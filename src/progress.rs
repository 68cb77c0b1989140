//! Spinner shown on stderr while an update check runs
//!
//! The spinner is hidden in quiet and JSON modes so stdout carries only the report.

use crate::domain::CheckOutcome;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use log::debug;
use std::time::Duration;

const TICK: Duration = Duration::from_millis(80);

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.cyan} {msg} {elapsed:.dim}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
}

/// Progress of one update check
pub struct CheckProgress {
    bar: ProgressBar,
}

impl CheckProgress {
    /// Create a spinner; a disabled one draws nothing
    pub fn new(enabled: bool) -> Self {
        let bar = if enabled {
            ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr())
        } else {
            ProgressBar::hidden()
        };
        bar.set_style(spinner_style());
        Self { bar }
    }

    /// Returns true if the spinner is drawn
    pub fn is_visible(&self) -> bool {
        !self.bar.is_hidden()
    }

    /// Announce a check of `sources` URLs for `current_version`
    pub fn start(&self, current_version: &str, sources: usize) {
        let plural = if sources == 1 { "" } else { "s" };
        self.bar.set_message(format!(
            "Checking for updates to {} ({} source{})",
            current_version, sources, plural
        ));
        if self.is_visible() {
            self.bar.enable_steady_tick(TICK);
        }
    }

    /// Show that cancellation was requested
    pub fn cancelling(&self) {
        self.bar.set_message("Cancelling update check...");
    }

    /// Current spinner text
    pub fn message(&self) -> String {
        self.bar.message()
    }

    /// Clear the spinner once the outcome is known
    pub fn finish(&self, outcome: &CheckOutcome) {
        debug!(
            "update check {} after {:?}",
            outcome.status(),
            self.bar.elapsed()
        );
        self.bar.finish_and_clear();
    }
}
