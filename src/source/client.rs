//! HTTP client shared foundation
//!
//! This module provides a shared HTTP client with:
//! - Configurable default timeout and User-Agent
//! - Per-request User-Agent and timeout overrides
//! - Status and transport error mapping
//!
//! There is no retry loop here: falling back to the next descriptor source
//! is the only retry an update check performs.

use crate::error::FetchError;
use reqwest::header::{ACCEPT, USER_AGENT};
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Default timeout for HTTP requests (10 seconds)
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Product token used when no client id is configured
pub const DEFAULT_CLIENT_ID: &str = "upcheck";

/// Default User-Agent header
const DEFAULT_USER_AGENT: &str = concat!("upcheck/", env!("CARGO_PKG_VERSION"));

/// Build a `<client-id>/<version>` User-Agent value
pub fn user_agent(client_id: &str, version: &str) -> String {
    format!("{}/{}", client_id, version)
}

/// HTTP client wrapper
#[derive(Clone, Debug)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> Result<Self, FetchError> {
        Self::with_config(DEFAULT_TIMEOUT, DEFAULT_USER_AGENT)
    }

    /// Create a new HTTP client with custom configuration
    pub fn with_config(timeout: Duration, user_agent: &str) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| {
                FetchError::transport("", format!("failed to create HTTP client: {}", e))
            })?;

        Ok(Self { client })
    }

    /// GET `url` expecting a JSON body and return the raw bytes.
    ///
    /// Anything other than `200 OK` is an error.
    pub async fn get_json_body(
        &self,
        url: &str,
        user_agent: &str,
        timeout: Duration,
    ) -> Result<Vec<u8>, FetchError> {
        let response = self
            .client
            .get(url)
            .header(USER_AGENT, user_agent)
            .header(ACCEPT, "application/json")
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(url, &e))?;

        if response.status() != StatusCode::OK {
            return Err(FetchError::status(url, response.status().as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::from_reqwest(url, &e))?;

        Ok(body.to_vec())
    }
}
