//! Remote-fetch collaborators for URLs.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;

use crate::domain::errors::FetchError;
use crate::infra::config::Http;

/// Status and body of a completed GET request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub text: String,
}

impl FetchResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Issues a single GET per call. Implementations must not retry or cache.
#[async_trait]
pub trait RemoteFetcher: Send + Sync {
    async fn get(&self, url: &str) -> Result<FetchResponse, FetchError>;
}

/// [`RemoteFetcher`] backed by a shared [`reqwest::Client`].
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Build a client from the `[http]` configuration section.
    pub fn from_config(config: &Http) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent());
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().context("failed to build HTTP client")?;
        Ok(Self::with_client(client))
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RemoteFetcher for HttpFetcher {
    async fn get(&self, url: &str) -> Result<FetchResponse, FetchError> {
        tracing::debug!(%url, "fetching remote source");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| FetchError::new(err.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|err| FetchError::new(format!("failed to read response body: {err}")))?;
        Ok(FetchResponse { status, text })
    }
}
