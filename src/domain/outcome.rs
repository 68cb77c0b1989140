//! Terminal result of an update check

use super::VersionDescriptor;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The single result delivered for each check invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CheckOutcome {
    /// The remote version is strictly newer than the running one
    UpdateAvailable {
        /// Release metadata for the newer version
        descriptor: VersionDescriptor,
    },
    /// The running version is the latest (or newer)
    UpToDate,
    /// The check could not reach a conclusion
    CheckFailed {
        /// Human-readable reason
        message: String,
    },
}

impl CheckOutcome {
    /// Creates an UpdateAvailable outcome
    pub fn update_available(descriptor: VersionDescriptor) -> Self {
        CheckOutcome::UpdateAvailable { descriptor }
    }

    /// Creates a CheckFailed outcome
    pub fn failed(message: impl Into<String>) -> Self {
        CheckOutcome::CheckFailed {
            message: message.into(),
        }
    }

    /// Returns true if a newer release was found
    pub fn is_update_available(&self) -> bool {
        matches!(self, CheckOutcome::UpdateAvailable { .. })
    }

    /// Returns true if the check failed
    pub fn is_failure(&self) -> bool {
        matches!(self, CheckOutcome::CheckFailed { .. })
    }

    /// The descriptor of the newer release, if any
    pub fn descriptor(&self) -> Option<&VersionDescriptor> {
        match self {
            CheckOutcome::UpdateAvailable { descriptor } => Some(descriptor),
            _ => None,
        }
    }

    /// Status label used in logs and JSON output
    pub fn status(&self) -> &'static str {
        match self {
            CheckOutcome::UpdateAvailable { .. } => "update_available",
            CheckOutcome::UpToDate => "up_to_date",
            CheckOutcome::CheckFailed { .. } => "check_failed",
        }
    }
}

impl fmt::Display for CheckOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckOutcome::UpdateAvailable { descriptor } => {
                write!(f, "update available: {}", descriptor.latest_version)
            }
            CheckOutcome::UpToDate => write!(f, "up to date"),
            CheckOutcome::CheckFailed { message } => write!(f, "check failed: {}", message),
        }
    }
}
