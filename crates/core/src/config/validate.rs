use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Discord section exists (enforced by serde) and carries a token and channel
/// - Feed URL is set
/// - Server port is not 0
/// - Watcher and limit settings are non-zero
/// - The ledger holds at least one processing window of ids
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(invalid("server.port cannot be 0"));
    }

    if config.discord.bot_token.trim().is_empty() {
        return Err(invalid("discord.bot_token cannot be empty"));
    }

    if config.discord.channel_id.trim().is_empty() {
        return Err(invalid("discord.channel_id cannot be empty"));
    }

    if config.feed.url.trim().is_empty() {
        return Err(invalid("feed.url cannot be empty"));
    }

    if config.watcher.check_interval_ms == 0 {
        return Err(invalid("watcher.check_interval_ms cannot be 0"));
    }

    if config.watcher.processing_window == 0 {
        return Err(invalid("watcher.processing_window cannot be 0"));
    }

    if config.watcher.ledger_capacity == 0 {
        return Err(invalid("watcher.ledger_capacity cannot be 0"));
    }

    // A ledger smaller than the window forgets ids it just recorded.
    if config.watcher.ledger_capacity < config.watcher.processing_window {
        return Err(invalid(
            "watcher.ledger_capacity cannot be smaller than watcher.processing_window",
        ));
    }

    if config.subscriptions.max_keywords == 0 {
        return Err(invalid("subscriptions.max_keywords cannot be 0"));
    }

    if config.ranking.limit == 0 {
        return Err(invalid("ranking.limit cannot be 0"));
    }

    Ok(())
}

fn invalid(message: &str) -> ConfigError {
    ConfigError::ValidationError(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        DatabaseConfig, DiscordConfig, FeedConfig, RankingConfig, ServerConfig,
        SubscriptionConfig,
    };
    use crate::watcher::WatcherConfig;

    fn valid_config() -> Config {
        Config {
            discord: DiscordConfig {
                bot_token: "token".to_string(),
                channel_id: "42".to_string(),
                api_base_url: "https://discord.com/api/v10".to_string(),
                timeout_secs: 30,
            },
            feed: FeedConfig::default(),
            watcher: WatcherConfig::default(),
            subscriptions: SubscriptionConfig::default(),
            ranking: RankingConfig::default(),
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
        }
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn test_validate_port_zero_fails() {
        let mut config = valid_config();
        config.server.port = 0;
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_validate_empty_token_fails() {
        let mut config = valid_config();
        config.discord.bot_token = "  ".to_string();
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("bot_token"));
    }

    #[test]
    fn test_validate_empty_channel_fails() {
        let mut config = valid_config();
        config.discord.channel_id = String::new();
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("channel_id"));
    }

    #[test]
    fn test_validate_zero_window_fails() {
        let mut config = valid_config();
        config.watcher.processing_window = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_ledger_smaller_than_window_fails() {
        let mut config = valid_config();
        config.watcher.ledger_capacity = 5;
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
        assert!(err.to_string().contains("ledger_capacity"));

        config.watcher.ledger_capacity = config.watcher.processing_window;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_zero_interval_fails() {
        let mut config = valid_config();
        config.watcher.check_interval_ms = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_zero_max_keywords_fails() {
        let mut config = valid_config();
        config.subscriptions.max_keywords = 0;
        assert!(validate_config(&config).is_err());
    }
}
