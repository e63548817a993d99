use std::sync::Arc;

use herald_core::{Config, FeedWatcher, RankingService, SanitizedConfig, SubscriptionService};

/// Shared application state
pub struct AppState {
    config: Config,
    watcher: Arc<FeedWatcher>,
    subscriptions: SubscriptionService,
    rankings: RankingService,
}

impl AppState {
    pub fn new(
        config: Config,
        watcher: Arc<FeedWatcher>,
        subscriptions: SubscriptionService,
        rankings: RankingService,
    ) -> Self {
        Self {
            config,
            watcher,
            subscriptions,
            rankings,
        }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn watcher(&self) -> &FeedWatcher {
        self.watcher.as_ref()
    }

    pub fn subscriptions(&self) -> &SubscriptionService {
        &self.subscriptions
    }

    pub fn rankings(&self) -> &RankingService {
        &self.rankings
    }
}
