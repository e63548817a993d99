//! HTTP client for the Nyaa RSS feed.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::config::FeedConfig;

use super::parser::parse_nyaa_feed;
use super::{FeedError, FeedFetcher, FeedItem};

/// Fetches the configured RSS URL and parses it as a Nyaa feed.
pub struct NyaaFeedClient {
    client: Client,
    config: FeedConfig,
}

impl NyaaFeedClient {
    /// Create a new feed client with the given configuration.
    pub fn new(config: FeedConfig) -> Result<Self, FeedError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| FeedError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self::with_client(client, config))
    }

    /// Create a feed client around an existing reqwest client.
    pub fn with_client(client: Client, config: FeedConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl FeedFetcher for NyaaFeedClient {
    fn name(&self) -> &str {
        "nyaa"
    }

    fn url(&self) -> &str {
        &self.config.url
    }

    async fn fetch(&self) -> Result<Vec<FeedItem>, FeedError> {
        debug!(url = %self.config.url, "Fetching RSS feed");

        let response = self
            .client
            .get(&self.config.url)
            .send()
            .await
            .map_err(map_request_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Http {
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await.map_err(map_request_error)?;
        let items = parse_nyaa_feed(&bytes)?;

        debug!(items = items.len(), "Parsed RSS feed");
        Ok(items)
    }
}

fn map_request_error(e: reqwest::Error) -> FeedError {
    if e.is_timeout() {
        FeedError::Timeout
    } else if e.is_connect() {
        FeedError::ConnectionFailed(e.to_string())
    } else {
        FeedError::ConnectionFailed(format!("Request failed: {}", e))
    }
}
