//! Fans new items out to the broadcast channel and matching subscribers.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::feed::FeedItem;
use crate::metrics;
use crate::notifier::{NotificationKind, Notifier};
use crate::subscription::SubscriptionRegistry;

/// Delivery counts for one batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchSummary {
    pub broadcasts_sent: usize,
    pub broadcasts_failed: usize,
    pub direct_sent: usize,
    pub direct_failed: usize,
}

impl DispatchSummary {
    fn record(&mut self, kind: NotificationKind, delivered: bool) {
        let counter = match (kind, delivered) {
            (NotificationKind::Broadcast, true) => &mut self.broadcasts_sent,
            (NotificationKind::Broadcast, false) => &mut self.broadcasts_failed,
            (NotificationKind::Direct, true) => &mut self.direct_sent,
            (NotificationKind::Direct, false) => &mut self.direct_failed,
        };
        *counter += 1;

        let result = if delivered { "sent" } else { "failed" };
        metrics::NOTIFICATIONS_TOTAL
            .with_label_values(&[kind.as_str(), result])
            .inc();
    }
}

/// Announce each item, then wait `pacing` before the next one.
///
/// Every item gets one broadcast. Each (subscriber, keyword) pair whose
/// keyword occurs in the title gets its own direct message. Delivery errors
/// are logged and counted, never propagated.
pub async fn dispatch_items(
    items: &[FeedItem],
    registry: &SubscriptionRegistry,
    notifier: &dyn Notifier,
    pacing: Duration,
) -> DispatchSummary {
    let mut summary = DispatchSummary::default();

    for item in items {
        match notifier.send_broadcast(item).await {
            Ok(()) => {
                debug!(item_id = %item.id, "Broadcast sent");
                summary.record(NotificationKind::Broadcast, true);
            }
            Err(e) => {
                warn!(item_id = %item.id, error = %e, "Failed to send broadcast");
                summary.record(NotificationKind::Broadcast, false);
            }
        }

        for (subscriber_id, keywords) in registry.iter() {
            for keyword in keywords.iter().filter(|k| item.title_matches(k)) {
                match notifier.send_direct(subscriber_id, item, keyword).await {
                    Ok(()) => {
                        debug!(
                            item_id = %item.id,
                            subscriber = subscriber_id,
                            keyword = %keyword,
                            "Subscription notification sent"
                        );
                        summary.record(NotificationKind::Direct, true);
                    }
                    Err(e) => {
                        warn!(
                            item_id = %item.id,
                            subscriber = subscriber_id,
                            error = %e,
                            "Failed to send subscription notification"
                        );
                        summary.record(NotificationKind::Direct, false);
                    }
                }
            }
        }

        if !pacing.is_zero() {
            tokio::time::sleep(pacing).await;
        }
    }

    summary
}
