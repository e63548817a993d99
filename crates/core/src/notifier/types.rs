//! Notifier trait and delivery errors.

use async_trait::async_trait;
use thiserror::Error;

use crate::feed::FeedItem;

/// Errors from a single delivery attempt.
#[derive(Debug, Clone, Error)]
pub enum DeliveryError {
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    #[error("request timed out")]
    Timeout,

    #[error("API error (HTTP {status}): {message}")]
    ApiError { status: u16, message: String },

    /// The recipient cannot be messaged (unknown user, DMs closed).
    #[error("recipient unreachable: {0}")]
    RecipientUnreachable(String),

    #[error("internal error: {0}")]
    Internal(String),
}

/// Which audience a notification was addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Broadcast,
    Direct,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Broadcast => "broadcast",
            NotificationKind::Direct => "direct",
        }
    }
}

/// Delivers announcements about feed items.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Name of this notifier implementation.
    fn name(&self) -> &str;

    /// Announce an item to the shared channel.
    async fn send_broadcast(&self, item: &FeedItem) -> Result<(), DeliveryError>;

    /// Tell one subscriber that `item` matched their `keyword`.
    async fn send_direct(
        &self,
        subscriber_id: &str,
        item: &FeedItem,
        keyword: &str,
    ) -> Result<(), DeliveryError>;
}
