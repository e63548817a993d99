//! Testing utilities and mock implementations.
//!
//! Mocks for the feed, the notifier and the key-value store, so watcher
//! cycles can be exercised without network access or a database.
//!
//! # Example
//!
//! ```rust,ignore
//! use herald_core::testing::{fixtures, MemoryKvStore, MockFeedFetcher, MockNotifier};
//!
//! let fetcher = MockFeedFetcher::new();
//! fetcher.set_items(vec![fixtures::feed_item("1", "Some Anime - 01")]).await;
//!
//! let notifier = MockNotifier::new();
//! // ... run a cycle ...
//! assert_eq!(notifier.broadcast_ids().await, vec!["1"]);
//! ```

mod memory_store;
mod mock_feed;
mod mock_notifier;

pub use memory_store::MemoryKvStore;
pub use mock_feed::MockFeedFetcher;
pub use mock_notifier::{MockNotifier, RecordedDirect};

/// Test fixtures and helper functions.
pub mod fixtures {
    use chrono::{DateTime, Duration, FixedOffset, TimeZone, Utc};

    use crate::feed::FeedItem;

    /// A feed item with reasonable defaults, published 2024-03-15 12:00 UTC.
    pub fn feed_item(id: &str, title: &str) -> FeedItem {
        FeedItem {
            id: id.to_string(),
            title: title.to_string(),
            download_url: format!("https://nyaa.si/download/{}.torrent", id),
            view_url: format!("https://nyaa.si/view/{}", id),
            published_at: Some(Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap()),
            category: "Anime - English-translated".to_string(),
            size: "1.4 GiB".to_string(),
            seeders: 10,
            leechers: 2,
            downloads: 100,
            trusted: false,
            info_hash: format!("{:0>40}", id),
        }
    }

    /// A feed item with the given statistics.
    pub fn ranked_item(id: &str, seeders: u64, downloads: u64) -> FeedItem {
        FeedItem {
            seeders,
            downloads,
            ..feed_item(id, &format!("Item {}", id))
        }
    }

    /// A feed item published `age` before `now`.
    pub fn item_aged(id: &str, now: DateTime<FixedOffset>, age: Duration) -> FeedItem {
        FeedItem {
            published_at: Some((now - age).with_timezone(&Utc)),
            ..feed_item(id, &format!("Item {}", id))
        }
    }

    /// `count` items with ids `item-0`.. in feed order.
    pub fn feed_items(count: usize) -> Vec<FeedItem> {
        (0..count)
            .map(|i| feed_item(&format!("item-{}", i), &format!("Release {}", i)))
            .collect()
    }

    /// A two-item Nyaa RSS document.
    pub const SAMPLE_FEED_XML: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<rss xmlns:atom="http://www.w3.org/2005/Atom" xmlns:nyaa="https://nyaa.si/xmlns/nyaa" version="2.0">
  <channel>
    <title>Nyaa - Home - Torrent File RSS</title>
    <link>https://nyaa.si/</link>
    <item>
      <title>[SubsPlease] Frieren - 01 (1080p) [ABCD1234].mkv</title>
      <link>https://nyaa.si/download/1790001.torrent</link>
      <guid isPermaLink="true">https://nyaa.si/view/1790001</guid>
      <pubDate>Fri, 15 Mar 2024 12:00:00 -0000</pubDate>
      <nyaa:seeders>523</nyaa:seeders>
      <nyaa:leechers>41</nyaa:leechers>
      <nyaa:downloads>2210</nyaa:downloads>
      <nyaa:infoHash>0123456789abcdef0123456789abcdef01234567</nyaa:infoHash>
      <nyaa:categoryId>1_2</nyaa:categoryId>
      <nyaa:category>Anime - English-translated</nyaa:category>
      <nyaa:size>1.4 GiB</nyaa:size>
      <nyaa:trusted>Yes</nyaa:trusted>
      <nyaa:remake>No</nyaa:remake>
    </item>
    <item>
      <title>Some Album [FLAC]</title>
      <link>https://nyaa.si/download/1790000.torrent</link>
      <guid isPermaLink="true">https://nyaa.si/view/1790000</guid>
      <pubDate>Fri, 15 Mar 2024 11:30:00 -0000</pubDate>
      <nyaa:seeders>3</nyaa:seeders>
      <nyaa:leechers>0</nyaa:leechers>
      <nyaa:downloads>12</nyaa:downloads>
      <nyaa:infoHash>fedcba9876543210fedcba9876543210fedcba98</nyaa:infoHash>
      <nyaa:category>Audio - Lossless</nyaa:category>
      <nyaa:size>412.3 MiB</nyaa:size>
      <nyaa:trusted>No</nyaa:trusted>
    </item>
  </channel>
</rss>"#;

    /// Fixed instant used by ranking tests: 2024-03-15 18:00 at UTC+2.
    pub fn reference_now() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(2 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 3, 15, 18, 0, 0)
            .unwrap()
    }
}
