//! Core domain models for upcheck
//!
//! This module contains the value types passed between the checker and its caller:
//! - Version descriptors decoded from the update server
//! - Check requests
//! - Terminal check outcomes

mod descriptor;
mod outcome;
mod request;

pub use descriptor::{DescriptorError, RawDescriptor, VersionDescriptor, REQUIRED_FIELDS};
pub use outcome::CheckOutcome;
pub use request::{CheckRequest, DEFAULT_TIMEOUT};
