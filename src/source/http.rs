//! Descriptor source backed by an HTTP(S) URL

use crate::domain::{DescriptorError, VersionDescriptor};
use crate::error::FetchError;
use crate::source::{DescriptorSource, FetchContext, HttpClient};
use async_trait::async_trait;
use log::debug;

/// Fetches a JSON descriptor from a fixed URL
pub struct HttpSource {
    client: HttpClient,
    url: String,
}

impl HttpSource {
    /// Create a source for `url` sharing `client`
    pub fn new(client: HttpClient, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl DescriptorSource for HttpSource {
    fn location(&self) -> &str {
        &self.url
    }

    async fn fetch(&self, ctx: &FetchContext) -> Result<VersionDescriptor, FetchError> {
        debug!("fetching version descriptor from {}", self.url);

        let body = self
            .client
            .get_json_body(&self.url, &ctx.user_agent, ctx.timeout)
            .await?;

        VersionDescriptor::from_json(&body).map_err(|e| match e {
            DescriptorError::Decode(message) => FetchError::decode(&self.url, message),
            DescriptorError::MissingField(field) => FetchError::schema(&self.url, field),
        })
    }
}
