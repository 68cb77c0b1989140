//! Update checker for coordinating a single check
//!
//! This module provides:
//! - Workflow coordination: fetch → validate → compare
//! - Ordered fallback across descriptor sources
//! - Offline policy once every source has failed
//! - Cancellation of in-flight attempts

use crate::domain::{CheckOutcome, CheckRequest, VersionDescriptor};
use crate::error::FetchError;
use crate::source::{
    http_sources, user_agent, DescriptorSource, FetchContext, HttpClient, DEFAULT_CLIENT_ID,
};
use crate::version::is_newer;
use log::{debug, info, warn};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Message delivered when a check is cancelled
pub const CANCELLED_MESSAGE: &str = "update check cancelled";

/// Default delay before a simulated offline result
pub const SIMULATED_DELAY: Duration = Duration::from_millis(1500);

/// Default chance that a simulated offline result reports an update
pub const SIMULATED_UPDATE_PROBABILITY: f64 = 0.3;

/// What to report once every descriptor source has failed
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum OfflinePolicy {
    /// Report `CheckFailed` naming the last failure
    #[default]
    Fail,
    /// Wait `delay`, then report a canned update with `update_probability`,
    /// otherwise `UpToDate`. Intended for UI development without a server.
    Simulate {
        delay: Duration,
        update_probability: f64,
    },
}

impl OfflinePolicy {
    /// Simulation with the stock delay and probability
    pub fn simulate() -> Self {
        OfflinePolicy::Simulate {
            delay: SIMULATED_DELAY,
            update_probability: SIMULATED_UPDATE_PROBABILITY,
        }
    }
}

/// Runs update checks against descriptor sources
#[derive(Clone, Debug)]
pub struct UpdateChecker {
    /// HTTP client shared by all sources
    client: HttpClient,
    /// Product token for the User-Agent header
    client_id: String,
    /// Behaviour once all sources failed
    offline_policy: OfflinePolicy,
}

impl UpdateChecker {
    /// Create a checker with a default HTTP client
    pub fn new() -> Result<Self, FetchError> {
        Ok(Self::with_client(HttpClient::new()?))
    }

    /// Create a checker with a custom HTTP client
    pub fn with_client(client: HttpClient) -> Self {
        Self {
            client,
            client_id: DEFAULT_CLIENT_ID.to_string(),
            offline_policy: OfflinePolicy::default(),
        }
    }

    /// Set the User-Agent product token
    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = client_id.into();
        self
    }

    /// Set the offline policy
    pub fn with_offline_policy(mut self, policy: OfflinePolicy) -> Self {
        self.offline_policy = policy;
        self
    }

    /// The configured offline policy
    pub fn offline_policy(&self) -> OfflinePolicy {
        self.offline_policy
    }

    /// The HTTP client used for URL sources
    pub fn client(&self) -> &HttpClient {
        &self.client
    }

    /// Check the request's URLs in order and return the terminal outcome
    pub async fn check(&self, request: &CheckRequest, cancel: &CancellationToken) -> CheckOutcome {
        let sources = http_sources(&self.client, &request.sources);
        self.check_sources(&request.current_version, &sources, request.timeout, cancel)
            .await
    }

    /// Try each source in order; the first valid descriptor decides the outcome
    pub async fn check_sources(
        &self,
        current_version: &str,
        sources: &[Box<dyn DescriptorSource>],
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> CheckOutcome {
        if sources.is_empty() {
            return CheckOutcome::failed("no update sources configured");
        }

        let ctx = FetchContext {
            user_agent: user_agent(&self.client_id, current_version),
            timeout,
        };

        let mut last_error = None;
        for source in sources {
            match fetch_cancellable(source.as_ref(), &ctx, cancel).await {
                Ok(descriptor) => {
                    info!(
                        "version descriptor from {}: latest {}",
                        source.location(),
                        descriptor.latest_version
                    );
                    return evaluate(current_version, descriptor);
                }
                Err(e) if e.is_cancelled() => {
                    debug!("{}", e);
                    return CheckOutcome::failed(CANCELLED_MESSAGE);
                }
                Err(e) => {
                    warn!("{}", e);
                    last_error = Some(e);
                }
            }
        }

        self.offline_fallback(last_error, cancel).await
    }

    async fn offline_fallback(
        &self,
        last_error: Option<FetchError>,
        cancel: &CancellationToken,
    ) -> CheckOutcome {
        match self.offline_policy {
            OfflinePolicy::Fail => match last_error {
                Some(e) => CheckOutcome::failed(format!("network unreachable: {}", e)),
                None => CheckOutcome::failed("network unreachable"),
            },
            OfflinePolicy::Simulate {
                delay,
                update_probability,
            } => {
                warn!("all update sources failed, reporting a simulated result");
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => return CheckOutcome::failed(CANCELLED_MESSAGE),
                    _ = tokio::time::sleep(delay) => {}
                }

                if rand::random::<f64>() < update_probability {
                    CheckOutcome::update_available(simulated_descriptor())
                } else {
                    CheckOutcome::UpToDate
                }
            }
        }
    }
}

/// Race one fetch attempt against cancellation
async fn fetch_cancellable(
    source: &dyn DescriptorSource,
    ctx: &FetchContext,
    cancel: &CancellationToken,
) -> Result<VersionDescriptor, FetchError> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(FetchError::cancelled(source.location())),
        result = source.fetch(ctx) => result,
    }
}

/// Turn a validated descriptor into an outcome for `current_version`
pub fn evaluate(current_version: &str, descriptor: VersionDescriptor) -> CheckOutcome {
    if descriptor.latest_version.is_empty() {
        return CheckOutcome::failed("invalid version information: latest_version is empty");
    }

    if is_newer(current_version, &descriptor.latest_version) {
        CheckOutcome::update_available(descriptor)
    } else {
        debug!(
            "{} is not newer than {}",
            descriptor.latest_version, current_version
        );
        CheckOutcome::UpToDate
    }
}

/// Placeholder release reported by [`OfflinePolicy::Simulate`]
pub fn simulated_descriptor() -> VersionDescriptor {
    VersionDescriptor::new(
        "2.2.0",
        "2024-12-15",
        "https://example.com/releases/latest",
    )
    .with_changelog("https://example.com/CHANGELOG.md")
    .with_priority("normal")
    .with_changes([
        "Added: automatic update checks",
        "Improved: scrolling in the about dialog",
        "Fixed: known performance issues",
        "Improved: tab management",
        "Improved: overall stability",
    ])
}
