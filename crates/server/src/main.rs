use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use herald_core::{
    load_config, validate_config, Clock, DiscordNotifier, FeedFetcher, FeedWatcher,
    KeyValueStore, Notifier, NyaaFeedClient, RankingService, SqliteKvStore, SubscriptionService,
    SystemClock,
};
use herald_server::api::create_router;
use herald_server::state::AppState;

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine config path
    let config_path = std::env::var("HERALD_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    let config_json = serde_json::to_string(&herald_core::SanitizedConfig::from(&config))
        .unwrap_or_default();
    let config_hash = format!("{:x}", Sha256::digest(config_json.as_bytes()));
    info!(
        version = VERSION,
        config_hash = &config_hash[..16],
        "Configuration loaded successfully"
    );
    info!("Database path: {:?}", config.database.path);
    info!("Feed URL: {}", config.feed.url);

    // Create SQLite key-value store (ledger + subscriptions)
    let store: Arc<dyn KeyValueStore> = Arc::new(
        SqliteKvStore::new(&config.database.path).context("Failed to open key-value store")?,
    );
    info!("Key-value store initialized");

    // Create feed client
    let fetcher: Arc<dyn FeedFetcher> = Arc::new(
        NyaaFeedClient::new(config.feed.clone()).context("Failed to create feed client")?,
    );

    // Create Discord notifier
    let notifier: Arc<dyn Notifier> = Arc::new(
        DiscordNotifier::new(config.discord.clone())
            .context("Failed to create Discord notifier")?,
    );
    info!("Discord notifier targeting channel {}", config.discord.channel_id);

    let watcher = Arc::new(FeedWatcher::new(
        config.watcher.clone(),
        Arc::clone(&fetcher),
        Arc::clone(&store),
        notifier,
    ));

    if config.watcher.enabled {
        watcher.start().await;
    } else {
        info!("Periodic feed checks disabled in config");
    }

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let subscriptions = SubscriptionService::new(store, config.subscriptions.max_keywords);
    let rankings = RankingService::new(fetcher, clock, config.ranking.limit);

    // Create app state
    let state = Arc::new(AppState::new(
        config.clone(),
        Arc::clone(&watcher),
        subscriptions,
        rankings,
    ));

    // Create router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutting down...");
    if watcher.is_running() {
        watcher.stop().await;
    }

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
