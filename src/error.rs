//! Application error types using thiserror
//!
//! Error hierarchy:
//! - FetchError: a single descriptor source could not produce a valid descriptor
//! - VersionError: a version string could not be parsed into numeric components
//! - ConfigError: issues with the config file or CLI configuration

use std::path::PathBuf;
use thiserror::Error;

/// Errors that stop a check from starting
#[derive(Error, Debug)]
pub enum AppError {
    /// HTTP client construction failed
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Configuration related errors
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors raised while fetching and validating a descriptor from one source.
///
/// Every variant is recoverable at the orchestration level: the checker logs
/// it and moves on to the next source.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Request did not complete within the per-attempt timeout
    #[error("request to {url} timed out")]
    Timeout { url: String },

    /// Connection refused/reset, DNS failure and similar
    #[error("failed to reach {url}: {message}")]
    Transport { url: String, message: String },

    /// Server answered with something other than 200 OK
    #[error("unexpected HTTP status {status} from {url}")]
    Status { url: String, status: u16 },

    /// Body was not valid JSON, or a field had the wrong type
    #[error("invalid JSON from {url}: {message}")]
    Decode { url: String, message: String },

    /// JSON parsed but a required field is missing
    #[error("invalid version descriptor from {url}: missing required field '{field}'")]
    Schema { url: String, field: &'static str },

    /// The check was cancelled while this attempt was in flight
    #[error("request to {url} was cancelled")]
    Cancelled { url: String },
}

/// A version string that does not consist of dot-separated integers
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VersionError {
    /// Version string is empty after prefix stripping
    #[error("empty version string")]
    Empty,

    /// A component failed to parse as an integer
    #[error("invalid component '{component}' in version '{version}'")]
    InvalidComponent { version: String, component: String },
}

/// Errors related to configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read config file {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for the expected schema
    #[error("failed to parse config file {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    /// A required setting was not provided by file or flags
    #[error("missing setting '{key}': set it in the config file or pass --{flag}")]
    Missing {
        key: &'static str,
        flag: &'static str,
    },

    /// Invalid duration format
    #[error("invalid duration format '{value}': expected format like '500ms', '10s', '1m'")]
    InvalidDuration { value: String },

    /// Value outside the accepted range
    #[error("invalid value for '{key}': {message}")]
    InvalidValue { key: &'static str, message: String },
}

impl FetchError {
    /// Creates a new Timeout error
    pub fn timeout(url: impl Into<String>) -> Self {
        FetchError::Timeout { url: url.into() }
    }

    /// Creates a new Transport error
    pub fn transport(url: impl Into<String>, message: impl Into<String>) -> Self {
        FetchError::Transport {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Creates a new Status error
    pub fn status(url: impl Into<String>, status: u16) -> Self {
        FetchError::Status {
            url: url.into(),
            status,
        }
    }

    /// Creates a new Decode error
    pub fn decode(url: impl Into<String>, message: impl Into<String>) -> Self {
        FetchError::Decode {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Creates a new Schema error
    pub fn schema(url: impl Into<String>, field: &'static str) -> Self {
        FetchError::Schema {
            url: url.into(),
            field,
        }
    }

    /// Creates a new Cancelled error
    pub fn cancelled(url: impl Into<String>) -> Self {
        FetchError::Cancelled { url: url.into() }
    }

    /// Converts a reqwest error into the matching variant
    pub fn from_reqwest(url: &str, err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::timeout(url)
        } else if err.is_decode() {
            FetchError::decode(url, err.to_string())
        } else {
            FetchError::transport(url, err.to_string())
        }
    }

    /// The source URL this error refers to
    pub fn url(&self) -> &str {
        match self {
            FetchError::Timeout { url }
            | FetchError::Transport { url, .. }
            | FetchError::Status { url, .. }
            | FetchError::Decode { url, .. }
            | FetchError::Schema { url, .. }
            | FetchError::Cancelled { url } => url,
        }
    }

    /// Returns true if the attempt was aborted by cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, FetchError::Cancelled { .. })
    }
}

impl ConfigError {
    /// Creates a new Missing error
    pub fn missing(key: &'static str, flag: &'static str) -> Self {
        ConfigError::Missing { key, flag }
    }

    /// Creates a new InvalidValue error
    pub fn invalid_value(key: &'static str, message: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            key,
            message: message.into(),
        }
    }
}
