//! Descriptor sources for fetching release metadata
//!
//! This module provides:
//! - HTTP client shared foundation
//! - HTTP(S) descriptor source
//! - The `DescriptorSource` trait the checker iterates over

mod client;
mod http;

pub use client::{user_agent, HttpClient, DEFAULT_CLIENT_ID};
pub use http::HttpSource;

use crate::domain::VersionDescriptor;
use crate::error::FetchError;
use async_trait::async_trait;
use std::time::Duration;

/// Per-invocation settings handed to each fetch attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchContext {
    /// Value of the User-Agent header
    pub user_agent: String,
    /// Timeout for this single attempt
    pub timeout: Duration,
}

/// Trait for descriptor sources
#[async_trait]
pub trait DescriptorSource: Send + Sync {
    /// Where this source fetches from, for logs and messages
    fn location(&self) -> &str;

    /// Fetch and validate one descriptor
    async fn fetch(&self, ctx: &FetchContext) -> Result<VersionDescriptor, FetchError>;
}

/// Create HTTP sources for each URL, in order
pub fn http_sources(client: &HttpClient, urls: &[String]) -> Vec<Box<dyn DescriptorSource>> {
    urls.iter()
        .map(|url| Box::new(HttpSource::new(client.clone(), url.clone())) as Box<dyn DescriptorSource>)
        .collect()
}
