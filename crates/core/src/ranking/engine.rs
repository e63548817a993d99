//! Filtering and ordering of feed items for rankings.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::feed::FeedItem;

/// Default number of entries in a ranking.
pub const DEFAULT_RANKING_LIMIT: usize = 10;

/// Publish-time filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeWindow {
    /// Published since local midnight.
    Today,
    /// Published within the last 7 days.
    ThisWeek,
    /// No filter.
    All,
}

impl TimeWindow {
    /// Earliest accepted publish time, or `None` for no filter.
    fn cutoff(&self, clock: &dyn Clock) -> Option<DateTime<Utc>> {
        match self {
            TimeWindow::Today => Some(clock.start_of_day()),
            TimeWindow::ThisWeek => Some((clock.now() - Duration::days(7)).with_timezone(&Utc)),
            TimeWindow::All => None,
        }
    }

    fn accepts(&self, item: &FeedItem, cutoff: Option<DateTime<Utc>>) -> bool {
        match cutoff {
            None => true,
            Some(cutoff) => item.published_at.is_some_and(|at| at >= cutoff),
        }
    }
}

/// Sort key, always descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankBy {
    /// Seeders plus downloads.
    Popularity,
    /// Seeders only; items without seeders are dropped.
    Seeders,
}

impl RankBy {
    fn key(&self, item: &FeedItem) -> u64 {
        match self {
            RankBy::Popularity => item.popularity(),
            RankBy::Seeders => item.seeders,
        }
    }

    fn accepts(&self, item: &FeedItem) -> bool {
        match self {
            RankBy::Popularity => true,
            RankBy::Seeders => item.seeders > 0,
        }
    }
}

/// The rankings exposed to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingQuery {
    TopToday,
    TopWeek,
    MostSeeded,
}

impl RankingQuery {
    pub fn window(&self) -> TimeWindow {
        match self {
            RankingQuery::TopToday => TimeWindow::Today,
            RankingQuery::TopWeek => TimeWindow::ThisWeek,
            RankingQuery::MostSeeded => TimeWindow::All,
        }
    }

    pub fn order(&self) -> RankBy {
        match self {
            RankingQuery::TopToday | RankingQuery::TopWeek => RankBy::Popularity,
            RankingQuery::MostSeeded => RankBy::Seeders,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RankingQuery::TopToday => "top_today",
            RankingQuery::TopWeek => "top_week",
            RankingQuery::MostSeeded => "most_seeded",
        }
    }
}

/// One row of a ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedItem {
    /// 1-based position.
    pub rank: usize,
    pub title: String,
    pub view_url: String,
    pub download_url: String,
    pub category: String,
    pub size: String,
    pub seeders: u64,
    pub leechers: u64,
    pub downloads: u64,
    pub trusted: bool,
    pub published_at: Option<DateTime<Utc>>,
}

impl RankedItem {
    fn new(rank: usize, item: &FeedItem) -> Self {
        Self {
            rank,
            title: item.title.clone(),
            view_url: item.view_url.clone(),
            download_url: item.download_url.clone(),
            category: item.category.clone(),
            size: item.size.clone(),
            seeders: item.seeders,
            leechers: item.leechers,
            downloads: item.downloads,
            trusted: item.trusted,
            published_at: item.published_at,
        }
    }
}

/// Filter by window, filter by order, sort descending (feed order kept on
/// ties), take `limit`.
///
/// Items with no parseable publish date only appear under `TimeWindow::All`.
pub fn rank_items(
    items: &[FeedItem],
    window: TimeWindow,
    order: RankBy,
    clock: &dyn Clock,
    limit: usize,
) -> Vec<RankedItem> {
    let cutoff = window.cutoff(clock);

    let mut selected: Vec<&FeedItem> = items
        .iter()
        .filter(|item| window.accepts(item, cutoff))
        .filter(|item| order.accepts(item))
        .collect();

    // sort_by is stable
    selected.sort_by(|a, b| order.key(b).cmp(&order.key(a)));

    selected
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(idx, item)| RankedItem::new(idx + 1, item))
        .collect()
}
