use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;

use crate::watcher::WatcherConfig;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub discord: DiscordConfig,
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub watcher: WatcherConfig,
    #[serde(default)]
    pub subscriptions: SubscriptionConfig,
    #[serde(default)]
    pub ranking: RankingConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::from([0, 0, 0, 0])
}

fn default_port() -> u16 {
    8080
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("herald.db")
}

/// Feed source configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FeedConfig {
    /// RSS feed URL (e.g., "https://nyaa.si/?page=rss")
    #[serde(default = "default_feed_url")]
    pub url: String,
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
    /// User-Agent header sent with feed requests
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            url: default_feed_url(),
            timeout_secs: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_feed_url() -> String {
    "https://nyaa.si/?page=rss".to_string()
}

fn default_user_agent() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

/// Discord delivery configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DiscordConfig {
    /// Bot token used for the `Authorization: Bot` header
    pub bot_token: String,
    /// Channel receiving broadcast announcements
    pub channel_id: String,
    /// REST API base URL
    #[serde(default = "default_discord_api")]
    pub api_base_url: String,
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

fn default_discord_api() -> String {
    "https://discord.com/api/v10".to_string()
}

fn default_timeout() -> u32 {
    30
}

/// Keyword subscription limits
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SubscriptionConfig {
    /// Maximum keywords a single subscriber may hold
    #[serde(default = "default_max_keywords")]
    pub max_keywords: usize,
}

impl Default for SubscriptionConfig {
    fn default() -> Self {
        Self {
            max_keywords: default_max_keywords(),
        }
    }
}

fn default_max_keywords() -> usize {
    10
}

/// On-demand ranking configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RankingConfig {
    /// Maximum entries returned per ranking query
    #[serde(default = "default_ranking_limit")]
    pub limit: usize,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            limit: default_ranking_limit(),
        }
    }
}

fn default_ranking_limit() -> usize {
    10
}

/// Sanitized config for API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub discord: SanitizedDiscordConfig,
    pub feed: FeedConfig,
    pub watcher: WatcherConfig,
    pub subscriptions: SubscriptionConfig,
    pub ranking: RankingConfig,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
}

/// Sanitized Discord config (bot token hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedDiscordConfig {
    pub channel_id: String,
    pub api_base_url: String,
    pub bot_token_configured: bool,
    pub timeout_secs: u32,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            discord: SanitizedDiscordConfig {
                channel_id: config.discord.channel_id.clone(),
                api_base_url: config.discord.api_base_url.clone(),
                bot_token_configured: !config.discord.bot_token.is_empty(),
                timeout_secs: config.discord.timeout_secs,
            },
            feed: config.feed.clone(),
            watcher: config.watcher.clone(),
            subscriptions: config.subscriptions.clone(),
            ranking: config.ranking.clone(),
            server: config.server.clone(),
            database: config.database.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn discord() -> DiscordConfig {
        DiscordConfig {
            bot_token: "secret-token".to_string(),
            channel_id: "1234".to_string(),
            api_base_url: default_discord_api(),
            timeout_secs: 30,
        }
    }

    #[test]
    fn test_deserialize_minimal_config() {
        let toml = r#"
[discord]
bot_token = "abc"
channel_id = "999"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.discord.api_base_url, "https://discord.com/api/v10");
        assert_eq!(config.feed.url, "https://nyaa.si/?page=rss");
        assert_eq!(config.feed.timeout_secs, 30);
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host.to_string(), "0.0.0.0");
        assert_eq!(config.subscriptions.max_keywords, 10);
        assert_eq!(config.ranking.limit, 10);
        assert_eq!(config.database.path.to_str().unwrap(), "herald.db");
    }

    #[test]
    fn test_deserialize_missing_discord_fails() {
        let toml = r#"
[server]
port = 8080
"#;
        let result: Result<Config, _> = toml::from_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn test_deserialize_full_config() {
        let toml = r#"
[discord]
bot_token = "abc"
channel_id = "999"
api_base_url = "http://localhost:9000/api"
timeout_secs = 5

[feed]
url = "https://sukebei.example/?page=rss"
timeout_secs = 10

[subscriptions]
max_keywords = 3

[ranking]
limit = 5

[database]
path = "/data/herald.sqlite"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.discord.api_base_url, "http://localhost:9000/api");
        assert_eq!(config.discord.timeout_secs, 5);
        assert_eq!(config.feed.url, "https://sukebei.example/?page=rss");
        assert_eq!(config.feed.timeout_secs, 10);
        assert_eq!(config.subscriptions.max_keywords, 3);
        assert_eq!(config.ranking.limit, 5);
        assert_eq!(
            config.database.path.to_str().unwrap(),
            "/data/herald.sqlite"
        );
    }

    #[test]
    fn test_sanitized_config_hides_token() {
        let config = Config {
            discord: discord(),
            feed: FeedConfig::default(),
            watcher: WatcherConfig::default(),
            subscriptions: SubscriptionConfig::default(),
            ranking: RankingConfig::default(),
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
        };

        let sanitized = SanitizedConfig::from(&config);
        assert!(sanitized.discord.bot_token_configured);
        assert_eq!(sanitized.discord.channel_id, "1234");

        let json = serde_json::to_string(&sanitized).unwrap();
        assert!(!json.contains("secret-token"));
    }
}
