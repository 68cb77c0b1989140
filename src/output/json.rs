//! JSON output formatter for machine processing

use crate::domain::CheckOutcome;
use crate::output::{CheckReport, OutputFormatter, Verbosity};
use serde::Serialize;
use std::io::Write;

/// JSON formatter for machine-readable output
pub struct JsonFormatter {
    /// Verbosity level affects detail in output
    verbosity: Verbosity,
}

impl JsonFormatter {
    /// Create a new JSON formatter
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }
}

/// JSON representation of a report
#[derive(Serialize)]
struct JsonOutput<'a> {
    /// The running version (verbose only)
    #[serde(skip_serializing_if = "Option::is_none")]
    current_version: Option<&'a str>,
    /// Its release date (verbose only)
    #[serde(skip_serializing_if = "Option::is_none")]
    current_release_date: Option<&'a str>,
    #[serde(flatten)]
    outcome: &'a CheckOutcome,
}

impl OutputFormatter for JsonFormatter {
    fn format(&self, report: &CheckReport<'_>, writer: &mut dyn Write) -> std::io::Result<()> {
        let verbose = self.verbosity == Verbosity::Verbose;
        let output = JsonOutput {
            current_version: verbose.then_some(report.current_version),
            current_release_date: report.current_release_date.filter(|_| verbose),
            outcome: report.outcome,
        };

        let json = serde_json::to_string_pretty(&output).map_err(std::io::Error::other)?;
        writeln!(writer, "{}", json)
    }
}
