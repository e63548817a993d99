//! Types for feed snapshots.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Placeholder used when the feed omits a category or size.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// One normalized feed entry.
///
/// Reconstructed on every fetch; only `id` outlives the snapshot (in the
/// seen-item ledger).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedItem {
    /// Stable identity (the entry's guid), also the canonical details link.
    pub id: String,
    pub title: String,
    /// .torrent download URL.
    pub download_url: String,
    /// Details page URL.
    pub view_url: String,
    /// `None` when the feed's date could not be parsed.
    pub published_at: Option<DateTime<Utc>>,
    pub category: String,
    /// Human readable size as listed by the feed (e.g. "1.4 GiB").
    pub size: String,
    pub seeders: u64,
    pub leechers: u64,
    pub downloads: u64,
    pub trusted: bool,
    /// Info hash, empty if the feed does not list one.
    pub info_hash: String,
}

impl FeedItem {
    /// Seeders plus completed downloads.
    pub fn popularity(&self) -> u64 {
        self.seeders.saturating_add(self.downloads)
    }

    /// Case-insensitive substring match against the title.
    pub fn title_matches(&self, keyword: &str) -> bool {
        self.title.to_lowercase().contains(&keyword.to_lowercase())
    }
}

/// An `<item>` as it appears in the XML, before defaults are applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawFeedItem {
    pub guid: Option<String>,
    pub title: Option<String>,
    pub link: Option<String>,
    pub pub_date: Option<String>,
    pub category: Option<String>,
    pub size: Option<String>,
    pub seeders: Option<String>,
    pub leechers: Option<String>,
    pub downloads: Option<String>,
    pub trusted: Option<String>,
    pub info_hash: Option<String>,
}

impl RawFeedItem {
    /// Apply the documented defaults. Returns `None` if the entry has no
    /// identity or title to work with.
    pub fn normalize(self) -> Option<FeedItem> {
        let id = self.guid.filter(|g| !g.trim().is_empty())?;
        let title = self.title?;

        Some(FeedItem {
            view_url: id.clone(),
            download_url: self.link.unwrap_or_default(),
            published_at: self.pub_date.as_deref().and_then(parse_pub_date),
            category: self.category.unwrap_or_else(|| UNKNOWN_LABEL.to_string()),
            size: self.size.unwrap_or_else(|| UNKNOWN_LABEL.to_string()),
            seeders: parse_count(self.seeders.as_deref()),
            leechers: parse_count(self.leechers.as_deref()),
            downloads: parse_count(self.downloads.as_deref()),
            trusted: self.trusted.as_deref().map(str::trim) == Some("Yes"),
            info_hash: self.info_hash.unwrap_or_default(),
            id,
            title,
        })
    }
}

/// RSS dates are RFC 2822 (`Wed, 16 Oct 2024 10:00:00 -0000`).
fn parse_pub_date(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(value.trim())
        .ok()
        .map(|d| d.with_timezone(&Utc))
}

fn parse_count(value: Option<&str>) -> u64 {
    value.and_then(|v| v.trim().parse().ok()).unwrap_or(0)
}

/// Errors that can occur while fetching the feed.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Feed connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Feed request timeout")]
    Timeout,

    #[error("Feed returned HTTP {status}")]
    Http { status: u16 },

    #[error("Failed to parse feed: {0}")]
    Parse(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Source of feed snapshots.
#[async_trait]
pub trait FeedFetcher: Send + Sync {
    /// Source name for logging.
    fn name(&self) -> &str;

    /// The URL being polled.
    fn url(&self) -> &str;

    /// Fetch and parse the current feed, preserving the source's order.
    async fn fetch(&self) -> Result<Vec<FeedItem>, FeedError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw() -> RawFeedItem {
        RawFeedItem {
            guid: Some("https://nyaa.si/view/1".to_string()),
            title: Some("[Group] Show - 01 [1080p].mkv".to_string()),
            link: Some("https://nyaa.si/download/1.torrent".to_string()),
            pub_date: Some("Wed, 16 Oct 2024 10:00:00 -0000".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_normalize_applies_defaults() {
        let item = raw().normalize().unwrap();
        assert_eq!(item.id, "https://nyaa.si/view/1");
        assert_eq!(item.view_url, item.id);
        assert_eq!(item.category, "Unknown");
        assert_eq!(item.size, "Unknown");
        assert_eq!(item.seeders, 0);
        assert_eq!(item.leechers, 0);
        assert_eq!(item.downloads, 0);
        assert!(!item.trusted);
        assert_eq!(item.info_hash, "");
        assert!(item.published_at.is_some());
    }

    #[test]
    fn test_normalize_parses_stats() {
        let mut r = raw();
        r.seeders = Some("12".to_string());
        r.leechers = Some(" 3 ".to_string());
        r.downloads = Some("not-a-number".to_string());
        r.trusted = Some("Yes".to_string());
        let item = r.normalize().unwrap();
        assert_eq!(item.seeders, 12);
        assert_eq!(item.leechers, 3);
        assert_eq!(item.downloads, 0);
        assert!(item.trusted);
    }

    #[test]
    fn test_normalize_requires_guid_and_title() {
        let mut no_guid = raw();
        no_guid.guid = None;
        assert!(no_guid.normalize().is_none());

        let mut no_title = raw();
        no_title.title = None;
        assert!(no_title.normalize().is_none());
    }

    #[test]
    fn test_invalid_date_is_none() {
        let mut r = raw();
        r.pub_date = Some("yesterday-ish".to_string());
        assert!(r.normalize().unwrap().published_at.is_none());
    }

    #[test]
    fn test_title_matches_is_case_insensitive() {
        let item = raw().normalize().unwrap();
        assert!(item.title_matches("show"));
        assert!(item.title_matches("1080P"));
        assert!(!item.title_matches("720p"));
    }

    #[test]
    fn test_popularity() {
        let mut item = raw().normalize().unwrap();
        item.seeders = 5;
        item.downloads = 10;
        assert_eq!(item.popularity(), 15);
    }
}
