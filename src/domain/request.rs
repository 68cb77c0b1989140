//! Inputs of a single update check

use std::time::Duration;

/// Default per-attempt timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Everything one check invocation needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckRequest {
    /// Version of the running application
    pub current_version: String,
    /// Descriptor URLs, tried in order until one succeeds
    pub sources: Vec<String>,
    /// Timeout for each individual fetch attempt
    pub timeout: Duration,
}

impl CheckRequest {
    /// Build the usual primary/backup request
    pub fn new(
        current_version: impl Into<String>,
        primary_url: impl Into<String>,
        backup_url: impl Into<String>,
    ) -> Self {
        Self {
            current_version: current_version.into(),
            sources: vec![primary_url.into(), backup_url.into()],
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Build a request over an arbitrary ordered list of sources
    pub fn with_sources<I, S>(current_version: impl Into<String>, sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            current_version: current_version.into(),
            sources: sources.into_iter().map(Into::into).collect(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Override the per-attempt timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
