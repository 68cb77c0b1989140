//! CLI argument parsing module for upcheck

use crate::config::OfflineMode;
use crate::error::ConfigError;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Parse duration string in format: Nms (milliseconds), Ns (seconds), Nm (minutes)
pub fn parse_duration(s: &str) -> Result<Duration, ConfigError> {
    let invalid = || ConfigError::InvalidDuration {
        value: s.to_string(),
    };
    let trimmed = s.trim();

    let (num_str, unit) = if let Some(n) = trimmed.strip_suffix("ms") {
        (n, "ms")
    } else if let Some(n) = trimmed.strip_suffix('s') {
        (n, "s")
    } else if let Some(n) = trimmed.strip_suffix('m') {
        (n, "m")
    } else {
        return Err(invalid());
    };

    let num: u64 = num_str.parse().map_err(|_| invalid())?;
    if num == 0 {
        return Err(invalid());
    }

    let duration = match unit {
        "ms" => Duration::from_millis(num),
        "s" => Duration::from_secs(num),
        _ => Duration::from_secs(num.checked_mul(60).ok_or_else(invalid)?),
    };

    Ok(duration)
}

/// Check whether a newer release is published
#[derive(Parser, Debug, Clone)]
#[command(
    name = "upcheck",
    version,
    about = "Check whether a newer release is available"
)]
pub struct CliArgs {
    /// Config file (default: ./upcheck.toml when present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    // Check inputs
    /// Version of the running application
    #[arg(long = "current", value_name = "VERSION")]
    pub current_version: Option<String>,

    /// Primary version descriptor URL
    #[arg(long = "primary", value_name = "URL")]
    pub primary_url: Option<String>,

    /// Backup version descriptor URL, tried when the primary fails
    #[arg(long = "backup", value_name = "URL")]
    pub backup_url: Option<String>,

    /// Timeout for each fetch attempt (e.g., 500ms, 10s, 1m)
    #[arg(long, value_parser = parse_duration)]
    pub timeout: Option<Duration>,

    /// Product token sent in the User-Agent header
    #[arg(long)]
    pub client_id: Option<String>,

    /// What to report when every source is unreachable
    #[arg(long, value_enum)]
    pub offline_fallback: Option<OfflineMode>,

    // Output options
    /// Output the outcome in JSON format
    #[arg(long)]
    pub json: bool,

    /// Enable verbose output (debug logging)
    #[arg(long)]
    pub verbose: bool,

    /// Enable quiet mode - minimal output
    #[arg(short, long)]
    pub quiet: bool,
}

impl CliArgs {
    /// Whether the progress spinner should be shown
    pub fn show_progress(&self) -> bool {
        !self.quiet && !self.json
    }
}
