pub mod clock;
pub mod config;
pub mod feed;
pub mod ledger;
pub mod metrics;
pub mod notifier;
pub mod ranking;
pub mod store;
pub mod subscription;
pub mod testing;
pub mod watcher;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, SanitizedConfig,
};
pub use feed::{FeedError, FeedFetcher, FeedItem, NyaaFeedClient};
pub use ledger::SeenLedger;
pub use notifier::{DeliveryError, DiscordNotifier, Notifier};
pub use ranking::{RankedItem, RankingQuery, RankingService};
pub use store::{KeyValueStore, SqliteKvStore, StoreError};
pub use subscription::{SubscriptionError, SubscriptionRegistry, SubscriptionService};
pub use watcher::{
    CycleOutcome, CycleReport, FeedWatcher, WatcherConfig, WatcherError, WatcherStatus,
};
