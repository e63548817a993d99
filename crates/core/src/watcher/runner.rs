//! Feed watcher implementation.
//!
//! One cycle: load ledger and registry, fetch, detect, dispatch, save the
//! ledger. At most one cycle runs at a time; a trigger arriving while one is
//! in flight is skipped.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use tokio::sync::{broadcast, Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::feed::FeedFetcher;
use crate::ledger::SeenLedger;
use crate::metrics;
use crate::notifier::Notifier;
use crate::store::{KeyValueStore, StoreError};
use crate::subscription::SubscriptionRegistry;

use super::config::WatcherConfig;
use super::detector::detect_new_items;
use super::dispatcher::dispatch_items;
use super::types::{CycleOutcome, CycleReport, LastCycle, WatcherError, WatcherStatus};

/// Everything a cycle needs, shared with the background task.
#[derive(Clone)]
struct CycleContext {
    config: WatcherConfig,
    fetcher: Arc<dyn FeedFetcher>,
    store: Arc<dyn KeyValueStore>,
    notifier: Arc<dyn Notifier>,
    in_flight: Arc<Mutex<()>>,
    last_cycle: Arc<RwLock<Option<LastCycle>>>,
}

impl CycleContext {
    async fn run_cycle(&self) -> Result<CycleOutcome, WatcherError> {
        let Ok(_guard) = self.in_flight.try_lock() else {
            debug!("Feed check already in progress, skipping");
            metrics::CYCLES_TOTAL.with_label_values(&["skipped"]).inc();
            return Ok(CycleOutcome::Skipped);
        };

        let started = Instant::now();
        let result = self.execute().await;
        let elapsed = started.elapsed().as_secs_f64();

        let (label, last) = match &result {
            Ok(report) => (
                "completed",
                LastCycle {
                    finished_at: Utc::now(),
                    report: Some(report.clone()),
                    error: None,
                },
            ),
            Err(e) => (
                e.label(),
                LastCycle {
                    finished_at: Utc::now(),
                    report: None,
                    error: Some(e.to_string()),
                },
            ),
        };
        metrics::CYCLES_TOTAL.with_label_values(&[label]).inc();
        metrics::CYCLE_DURATION
            .with_label_values(&[label])
            .observe(elapsed);
        *self.last_cycle.write().await = Some(last);

        result.map(CycleOutcome::Completed)
    }

    async fn execute(&self) -> Result<CycleReport, WatcherError> {
        let ledger = SeenLedger::load(self.store.as_ref(), self.config.ledger_capacity)?;
        let registry = SubscriptionRegistry::load(self.store.as_ref())?;

        let items = match self.fetcher.fetch().await {
            Ok(items) => {
                metrics::FEED_FETCHES.with_label_values(&["success"]).inc();
                items
            }
            Err(e) => {
                metrics::FEED_FETCHES.with_label_values(&["failed"]).inc();
                return Err(e.into());
            }
        };

        let detection = detect_new_items(&items, &ledger, self.config.processing_window);
        if detection.is_empty() {
            debug!(fetched = items.len(), "No new items found");
            return Ok(CycleReport {
                fetched: items.len(),
                ledger_size: ledger.len(),
                ..Default::default()
            });
        }

        info!(
            fetched = items.len(),
            new_items = detection.len(),
            "New items found"
        );
        metrics::NEW_ITEMS_TOTAL.inc_by(detection.len() as u64);

        let summary = dispatch_items(
            &detection.new_items,
            &registry,
            self.notifier.as_ref(),
            Duration::from_millis(self.config.pacing_ms),
        )
        .await;

        let updated = ledger.record_all(detection.new_ids());
        updated.save(self.store.as_ref())?;

        Ok(CycleReport::new(
            items.len(),
            detection.len(),
            summary,
            updated.len(),
        ))
    }
}

/// Periodically checks the feed and announces new items.
pub struct FeedWatcher {
    ctx: CycleContext,

    // Runtime state
    running: Arc<AtomicBool>,
    shutdown_tx: broadcast::Sender<()>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl FeedWatcher {
    /// Create a new watcher.
    pub fn new(
        config: WatcherConfig,
        fetcher: Arc<dyn FeedFetcher>,
        store: Arc<dyn KeyValueStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);

        Self {
            ctx: CycleContext {
                config,
                fetcher,
                store,
                notifier,
                in_flight: Arc::new(Mutex::new(())),
                last_cycle: Arc::new(RwLock::new(None)),
            },
            running: Arc::new(AtomicBool::new(false)),
            shutdown_tx,
            task: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &WatcherConfig {
        &self.ctx.config
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    /// Run one cycle now, unless one is already in flight.
    pub async fn run_cycle(&self) -> Result<CycleOutcome, WatcherError> {
        self.ctx.run_cycle().await
    }

    /// Start the periodic task. The first check runs immediately.
    pub async fn start(&self) {
        if self.running.swap(true, Ordering::SeqCst) {
            warn!("Feed watcher already running");
            return;
        }

        info!(
            interval_ms = self.ctx.config.check_interval_ms,
            feed = self.ctx.fetcher.url(),
            "Starting feed watcher"
        );

        let handle = self.spawn_check_loop();
        *self.task.lock().await = Some(handle);
    }

    /// Stop the periodic task. A cycle already in flight runs to completion.
    pub async fn stop(&self) {
        if !self.running.swap(false, Ordering::SeqCst) {
            warn!("Feed watcher not running");
            return;
        }

        info!("Stopping feed watcher");
        let _ = self.shutdown_tx.send(());

        if let Some(handle) = self.task.lock().await.take() {
            if let Err(e) = handle.await {
                error!("Feed watcher task ended abnormally: {}", e);
            }
        }

        info!("Feed watcher stopped");
    }

    /// Current status. Reads the ledger and registry from the store.
    pub async fn status(&self) -> Result<WatcherStatus, StoreError> {
        // The try_lock guard must be released before the first await.
        let cycle_in_progress = self.ctx.in_flight.try_lock().is_err();
        let store = self.ctx.store.as_ref();
        let tracked_items = SeenLedger::load(store, self.ctx.config.ledger_capacity)?.len();
        let subscribers = SubscriptionRegistry::load(store)?.subscriber_count();

        Ok(WatcherStatus {
            running: self.is_running(),
            cycle_in_progress,
            tracked_items,
            subscribers,
            check_interval_ms: self.ctx.config.check_interval_ms,
            feed_url: self.ctx.fetcher.url().to_string(),
            last_cycle: self.ctx.last_cycle.read().await.clone(),
        })
    }

    fn spawn_check_loop(&self) -> JoinHandle<()> {
        let running = Arc::clone(&self.running);
        let ctx = self.ctx.clone();
        let interval = Duration::from_millis(ctx.config.check_interval_ms);
        let mut shutdown_rx = self.shutdown_tx.subscribe();

        tokio::spawn(async move {
            info!("Feed check loop started");
            loop {
                if !running.load(Ordering::Relaxed) {
                    break;
                }

                match ctx.run_cycle().await {
                    Ok(CycleOutcome::Completed(report)) => {
                        debug!(new_items = report.new_items, "Feed check completed");
                    }
                    Ok(CycleOutcome::Skipped) => {}
                    Err(e) => warn!("Feed check failed: {}", e),
                }

                tokio::select! {
                    _ = shutdown_rx.recv() => {
                        info!("Feed check loop received shutdown signal");
                        break;
                    }
                    _ = tokio::time::sleep(interval) => {}
                }
            }
            info!("Feed check loop stopped");
        })
    }
}
