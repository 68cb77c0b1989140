//! upcheck - release update checker library
//!
//! This library checks whether a newer release of an application exists:
//! - Fetches a JSON version descriptor from a primary URL, falling back to a backup
//! - Validates the descriptor before any field is used
//! - Compares dotted numeric versions
//! - Delivers exactly one outcome per check, in the background if wanted

pub mod checker;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod notify;
pub mod output;
pub mod progress;
pub mod source;
pub mod version;

pub use checker::{OfflinePolicy, UpdateChecker};
pub use domain::{CheckOutcome, CheckRequest, VersionDescriptor};
pub use notify::{ChannelListener, CheckHandle, CheckListener};
