//! Configuration file loading and settings resolution
//!
//! Settings are layered: built-in defaults, then `upcheck.toml`, then CLI flags.

use crate::checker::{OfflinePolicy, SIMULATED_DELAY, SIMULATED_UPDATE_PROBABILITY};
use crate::cli::CliArgs;
use crate::domain::{CheckRequest, DEFAULT_TIMEOUT};
use crate::error::ConfigError;
use crate::source::DEFAULT_CLIENT_ID;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Config file looked up in the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "upcheck.toml";

/// Offline fallback mode as written in config and on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OfflineMode {
    /// Report a failed check
    #[default]
    Fail,
    /// Report a simulated result
    Simulate,
}

/// Contents of `upcheck.toml`; every key is optional
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub current_version: Option<String>,
    pub release_date: Option<String>,
    pub client_id: Option<String>,
    pub primary_url: Option<String>,
    pub backup_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub offline_fallback: Option<OfflineMode>,
    pub simulate_update_probability: Option<f64>,
    pub simulate_delay_ms: Option<u64>,
}

impl FileConfig {
    /// Read and parse a config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, path)
    }

    /// Parse config file content; `path` is only used in error messages
    pub fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

/// Load the explicit config file, or the default one if it exists
pub fn load_config(explicit: Option<&Path>) -> Result<FileConfig, ConfigError> {
    match explicit {
        Some(path) => FileConfig::load(path),
        None => {
            let path = PathBuf::from(DEFAULT_CONFIG_FILE);
            if path.is_file() {
                FileConfig::load(&path)
            } else {
                Ok(FileConfig::default())
            }
        }
    }
}

/// Fully resolved settings for one run
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub current_version: String,
    pub release_date: Option<String>,
    pub client_id: String,
    pub primary_url: String,
    pub backup_url: Option<String>,
    pub timeout: Duration,
    pub offline_policy: OfflinePolicy,
}

impl Settings {
    /// Merge file config with CLI flags; flags win
    pub fn resolve(file: FileConfig, args: &CliArgs) -> Result<Self, ConfigError> {
        let current_version = args
            .current_version
            .clone()
            .or(file.current_version)
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::missing("current_version", "current"))?;

        let primary_url = args
            .primary_url
            .clone()
            .or(file.primary_url)
            .ok_or_else(|| ConfigError::missing("primary_url", "primary"))?;

        let timeout = match (args.timeout, file.timeout_secs) {
            (Some(t), _) => t,
            (None, Some(0)) => {
                return Err(ConfigError::invalid_value(
                    "timeout_secs",
                    "must be greater than zero",
                ))
            }
            (None, Some(secs)) => Duration::from_secs(secs),
            (None, None) => DEFAULT_TIMEOUT,
        };

        let mode = args
            .offline_fallback
            .or(file.offline_fallback)
            .unwrap_or_default();
        let offline_policy = match mode {
            OfflineMode::Fail => OfflinePolicy::Fail,
            OfflineMode::Simulate => {
                let update_probability = file
                    .simulate_update_probability
                    .unwrap_or(SIMULATED_UPDATE_PROBABILITY);
                if !(0.0..=1.0).contains(&update_probability) {
                    return Err(ConfigError::invalid_value(
                        "simulate_update_probability",
                        format!("{} is not between 0 and 1", update_probability),
                    ));
                }
                OfflinePolicy::Simulate {
                    delay: file
                        .simulate_delay_ms
                        .map(Duration::from_millis)
                        .unwrap_or(SIMULATED_DELAY),
                    update_probability,
                }
            }
        };

        Ok(Self {
            current_version,
            release_date: file.release_date,
            client_id: args
                .client_id
                .clone()
                .or(file.client_id)
                .unwrap_or_else(|| DEFAULT_CLIENT_ID.to_string()),
            primary_url,
            backup_url: args.backup_url.clone().or(file.backup_url),
            timeout,
            offline_policy,
        })
    }

    /// Build the check request: primary first, then the backup if configured
    pub fn request(&self) -> CheckRequest {
        let mut sources = vec![self.primary_url.clone()];
        if let Some(backup) = &self.backup_url {
            sources.push(backup.clone());
        }
        CheckRequest::with_sources(&self.current_version, sources).with_timeout(self.timeout)
    }
}
