//! Text output formatter for human-readable display
//!
//! This module provides:
//! - Current → latest version display with change type (major/minor/patch)
//! - Release metadata and the ordered change list
//! - Short one-line output in quiet mode

use crate::domain::{CheckOutcome, VersionDescriptor};
use crate::output::{CheckReport, OutputFormatter, Verbosity};
use crate::version::VersionChangeType;
use chrono::{Local, NaiveDate};
use colored::Colorize;
use std::io::Write;

/// Get the change type label, optionally colored
fn change_label(change: VersionChangeType, color: bool) -> String {
    if !color {
        return change.label().to_string();
    }
    match change {
        VersionChangeType::Major => "major".red().bold().to_string(),
        VersionChangeType::Minor => "minor".yellow().to_string(),
        VersionChangeType::Patch => "patch".green().to_string(),
        VersionChangeType::Unknown => "?".dimmed().to_string(),
    }
}

/// Text formatter for human-readable output
pub struct TextFormatter {
    /// Verbosity level
    verbosity: Verbosity,
    /// Whether to use colors
    color: bool,
    /// Reference date for "N days ago"
    today: NaiveDate,
}

impl TextFormatter {
    /// Create a new text formatter with color option
    pub fn with_color(verbosity: Verbosity, color: bool) -> Self {
        Self {
            verbosity,
            color,
            today: Local::now().date_naive(),
        }
    }

    /// Use a fixed reference date (for testing)
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    fn release_label(&self, descriptor: &VersionDescriptor) -> String {
        match descriptor.release_date_parsed() {
            Some(date) => {
                let days = (self.today - date).num_days();
                match days {
                    d if d < 0 => descriptor.release_date.clone(),
                    0 => format!("{} (today)", descriptor.release_date),
                    1 => format!("{} (1 day ago)", descriptor.release_date),
                    d => format!("{} ({} days ago)", descriptor.release_date, d),
                }
            }
            None => descriptor.release_date.clone(),
        }
    }

    fn field(&self, name: &str, value: &str, writer: &mut dyn Write) -> std::io::Result<()> {
        let label = format!("{:<10}", format!("{}:", name));
        if self.color {
            writeln!(writer, "  {} {}", label.dimmed(), value)
        } else {
            writeln!(writer, "  {} {}", label, value)
        }
    }

    fn format_update(
        &self,
        current: &str,
        descriptor: &VersionDescriptor,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let latest = descriptor.latest_version.as_str();

        if self.verbosity == Verbosity::Quiet {
            return writeln!(writer, "update available: {}", latest);
        }

        let change = change_label(VersionChangeType::from_versions(current, latest), self.color);
        if self.color {
            writeln!(
                writer,
                "{} {} {} {} [{}]",
                "Update available:".bold(),
                current.dimmed(),
                "→".dimmed(),
                latest.bright_white().bold(),
                change
            )?;
        } else {
            writeln!(writer, "Update available: {} → {} [{}]", current, latest, change)?;
        }

        self.field("Released", &self.release_label(descriptor), writer)?;
        self.field("Download", &descriptor.download_url, writer)?;
        if let Some(changelog) = &descriptor.changelog_url {
            self.field("Changelog", changelog, writer)?;
        }
        if let Some(priority) = &descriptor.update_priority {
            self.field("Priority", priority, writer)?;
        }

        if !descriptor.changes.is_empty() {
            writeln!(writer)?;
            writeln!(writer, "Changes:")?;
            for change in &descriptor.changes {
                writeln!(writer, "  - {}", change)?;
            }
        }

        if self.verbosity == Verbosity::Verbose && !descriptor.extra.is_empty() {
            writeln!(writer)?;
            writeln!(writer, "Other fields:")?;
            for (key, value) in &descriptor.extra {
                writeln!(writer, "  {} = {}", key, value)?;
            }
        }

        Ok(())
    }

    fn format_up_to_date(
        &self,
        report: &CheckReport<'_>,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        if self.verbosity == Verbosity::Quiet {
            return writeln!(writer, "up to date");
        }

        let released = match (self.verbosity, report.current_release_date) {
            (Verbosity::Verbose, Some(date)) => format!(", released {}", date),
            _ => String::new(),
        };

        if self.color {
            writeln!(
                writer,
                "{} {} is the latest version{}",
                "✓".green(),
                report.current_version.bright_white(),
                released
            )
        } else {
            writeln!(
                writer,
                "✓ {} is the latest version{}",
                report.current_version, released
            )
        }
    }

    fn format_failed(&self, message: &str, writer: &mut dyn Write) -> std::io::Result<()> {
        if self.color {
            writeln!(writer, "{} {}", "Update check failed:".red(), message)
        } else {
            writeln!(writer, "Update check failed: {}", message)
        }
    }
}

impl OutputFormatter for TextFormatter {
    fn format(&self, report: &CheckReport<'_>, writer: &mut dyn Write) -> std::io::Result<()> {
        match report.outcome {
            CheckOutcome::UpdateAvailable { descriptor } => {
                self.format_update(report.current_version, descriptor, writer)
            }
            CheckOutcome::UpToDate => self.format_up_to_date(report, writer),
            CheckOutcome::CheckFailed { message } => self.format_failed(message, writer),
        }
    }
}
