//! Discord REST notifier.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::config::DiscordConfig;
use crate::feed::FeedItem;

use super::embed::{broadcast_embed, message_payload, personal_embed};
use super::{DeliveryError, Notifier};

#[derive(Debug, Deserialize)]
struct DmChannel {
    id: String,
}

/// Posts embeds through the Discord bot API.
pub struct DiscordNotifier {
    client: Client,
    config: DiscordConfig,
    /// Subscriber id -> DM channel id.
    dm_channels: RwLock<HashMap<String, String>>,
}

impl DiscordNotifier {
    pub fn new(config: DiscordConfig) -> Result<Self, DeliveryError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()
            .map_err(|e| DeliveryError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            config,
            dm_channels: RwLock::new(HashMap::new()),
        })
    }

    fn base_url(&self) -> &str {
        self.config.api_base_url.trim_end_matches('/')
    }

    fn auth_header(&self) -> String {
        format!("Bot {}", self.config.bot_token)
    }

    async fn post(&self, path: &str, body: &Value) -> Result<reqwest::Response, DeliveryError> {
        let url = format!("{}{}", self.base_url(), path);
        self.client
            .post(&url)
            .header(reqwest::header::AUTHORIZATION, self.auth_header())
            .json(body)
            .send()
            .await
            .map_err(map_request_error)
    }

    async fn post_message(&self, channel_id: &str, payload: &Value) -> Result<(), DeliveryError> {
        let response = self
            .post(&format!("/channels/{}/messages", channel_id), payload)
            .await?;
        check_status(response).await.map(|_| ())
    }

    /// Open (or reuse) the DM channel for a user.
    async fn dm_channel(&self, subscriber_id: &str) -> Result<String, DeliveryError> {
        if let Some(id) = self.dm_channels.read().await.get(subscriber_id) {
            return Ok(id.clone());
        }

        let response = self
            .post("/users/@me/channels", &json!({ "recipient_id": subscriber_id }))
            .await?;
        let response = check_status(response).await.map_err(|e| as_unreachable(subscriber_id, e))?;
        let channel: DmChannel = response
            .json()
            .await
            .map_err(|e| DeliveryError::Internal(format!("Invalid DM channel response: {}", e)))?;

        debug!(subscriber = subscriber_id, channel = %channel.id, "Opened DM channel");
        self.dm_channels
            .write()
            .await
            .insert(subscriber_id.to_string(), channel.id.clone());
        Ok(channel.id)
    }
}

#[async_trait]
impl Notifier for DiscordNotifier {
    fn name(&self) -> &str {
        "discord"
    }

    async fn send_broadcast(&self, item: &FeedItem) -> Result<(), DeliveryError> {
        let payload = message_payload(broadcast_embed(item));
        self.post_message(&self.config.channel_id, &payload).await
    }

    async fn send_direct(
        &self,
        subscriber_id: &str,
        item: &FeedItem,
        keyword: &str,
    ) -> Result<(), DeliveryError> {
        let channel_id = self.dm_channel(subscriber_id).await?;
        let payload = message_payload(personal_embed(item, keyword));

        match self.post_message(&channel_id, &payload).await {
            Err(e) => {
                // A stale channel should be reopened next time.
                self.dm_channels.write().await.remove(subscriber_id);
                Err(as_unreachable(subscriber_id, e))
            }
            ok => ok,
        }
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, DeliveryError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response.text().await.unwrap_or_default();
    warn!(status = status.as_u16(), "Discord API request failed");
    Err(DeliveryError::ApiError {
        status: status.as_u16(),
        message: message.chars().take(200).collect(),
    })
}

/// 403/404 on the DM path means the user cannot be reached.
fn as_unreachable(subscriber_id: &str, error: DeliveryError) -> DeliveryError {
    match error {
        DeliveryError::ApiError { status, .. }
            if status == StatusCode::FORBIDDEN.as_u16()
                || status == StatusCode::NOT_FOUND.as_u16() =>
        {
            DeliveryError::RecipientUnreachable(subscriber_id.to_string())
        }
        other => other,
    }
}

fn map_request_error(e: reqwest::Error) -> DeliveryError {
    if e.is_timeout() {
        DeliveryError::Timeout
    } else {
        DeliveryError::ConnectionFailed(e.to_string())
    }
}
