//! upcheck - release update checker CLI tool
//!
//! Fetches the published version descriptor and reports whether a newer
//! release than the configured current version is available.

use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use std::io::{self, Write};
use std::process::ExitCode;
use upcheck::cli::CliArgs;
use upcheck::config::{load_config, Settings};
use upcheck::error::AppError;
use upcheck::output::{create_formatter, CheckReport, OutputConfig};
use upcheck::progress::CheckProgress;
use upcheck::{ChannelListener, CheckOutcome, UpdateChecker};

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_level)).init();

    // Run the main logic and handle errors
    match run(args).await {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Resolve settings and build the checker they describe
fn prepare(args: &CliArgs) -> Result<(Settings, UpdateChecker), AppError> {
    let file_config = load_config(args.config.as_deref())?;
    let settings = Settings::resolve(file_config, args)?;
    let checker = UpdateChecker::new()?
        .with_client_id(settings.client_id.clone())
        .with_offline_policy(settings.offline_policy);
    Ok((settings, checker))
}

/// Main application logic
async fn run(args: CliArgs) -> anyhow::Result<ExitCode> {
    let (settings, checker) = prepare(&args).context("cannot start update check")?;

    if args.verbose {
        eprintln!("upcheck v{}", env!("CARGO_PKG_VERSION"));
        eprintln!("Current version: {}", settings.current_version);
        eprintln!("Primary: {}", settings.primary_url);
        if let Some(backup) = &settings.backup_url {
            eprintln!("Backup: {}", backup);
        }
        eprintln!("Offline fallback: {:?}", checker.offline_policy());
    }

    let request = settings.request();
    let progress = CheckProgress::new(args.show_progress());
    progress.start(&request.current_version, request.sources.len());

    let (listener, mut outcomes) = ChannelListener::new();
    let handle = checker.start_check(request, listener);

    let outcome = tokio::select! {
        outcome = outcomes.recv() => outcome,
        _ = tokio::signal::ctrl_c() => {
            progress.cancelling();
            handle.cancel();
            outcomes.recv().await
        }
    };
    let outcome =
        outcome.unwrap_or_else(|| CheckOutcome::failed("update check ended without a result"));
    progress.finish(&outcome);

    let formatter = create_formatter(OutputConfig::from_cli(args.json, args.verbose, args.quiet));
    let report = CheckReport {
        current_version: &settings.current_version,
        current_release_date: settings.release_date.as_deref(),
        outcome: &outcome,
    };
    let mut stdout = io::stdout().lock();
    formatter
        .format(&report, &mut stdout)
        .and_then(|()| stdout.flush())
        .context("failed to write report")?;

    if outcome.is_failure() {
        Ok(ExitCode::from(2))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
