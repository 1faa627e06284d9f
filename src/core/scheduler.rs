//! Cron-based refresher that keeps tracked symbols' latest prices current

use cron::Schedule;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, error, info, warn};

use crate::db::StockDatabase;
use crate::services::market_data::MarketDataProvider;

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("Scheduler disabled: interval_seconds is 0")]
    Disabled,

    #[error("Invalid cron expression '{expr}': {source}")]
    InvalidCron {
        expr: String,
        #[source]
        source: cron::error::Error,
    },
}

/// Outcome of one pass over every tracked symbol.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshSummary {
    pub updated: usize,
    pub failed: usize,
}

/// Cron expression firing every `interval_seconds`.
/// Cron format: second minute hour day month weekday
pub fn cron_expression(interval_seconds: u64) -> Result<String, SchedulerError> {
    if interval_seconds == 0 {
        return Err(SchedulerError::Disabled);
    }
    if interval_seconds >= 60 {
        Ok(format!("0 */{} * * * *", interval_seconds / 60))
    } else {
        Ok(format!("*/{} * * * * *", interval_seconds))
    }
}

pub fn schedule_for_interval(interval_seconds: u64) -> Result<Schedule, SchedulerError> {
    let expr = cron_expression(interval_seconds)?;
    Schedule::from_str(&expr).map_err(|source| SchedulerError::InvalidCron { expr, source })
}

/// Fetches a fresh quote for each tracked symbol and stores it, pausing
/// between symbols to stay under the provider's rate limit.
pub struct PriceRefresher {
    provider: Arc<dyn MarketDataProvider + Send + Sync>,
    database: Arc<StockDatabase>,
    delay: Duration,
    in_progress: Mutex<()>,
    handle: Arc<RwLock<Option<tokio::task::JoinHandle<()>>>>,
}

impl PriceRefresher {
    pub fn new(
        provider: Arc<dyn MarketDataProvider + Send + Sync>,
        database: Arc<StockDatabase>,
        delay: Duration,
    ) -> Self {
        Self {
            provider,
            database,
            delay,
            in_progress: Mutex::new(()),
            handle: Arc::new(RwLock::new(None)),
        }
    }

    /// Refresh every tracked symbol once. Returns `None` when another pass
    /// is already running.
    pub async fn refresh_all(&self) -> Option<RefreshSummary> {
        let _guard = self.in_progress.try_lock().ok()?;

        let symbols = match self.database.tracked_symbols().await {
            Ok(symbols) => symbols,
            Err(e) => {
                error!(error = %e, "PriceRefresher: failed to load tracked symbols");
                return Some(RefreshSummary::default());
            }
        };

        info!(symbol_count = symbols.len(), "PriceRefresher: refreshing {} symbols", symbols.len());

        let mut summary = RefreshSummary::default();
        for (i, symbol) in symbols.iter().enumerate() {
            if i > 0 && !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }

            match self.refresh_symbol(symbol).await {
                Ok(()) => {
                    debug!(symbol = %symbol, "PriceRefresher: updated {}", symbol);
                    summary.updated += 1;
                }
                Err(e) => {
                    warn!(symbol = %symbol, error = %e, "PriceRefresher: skipping {}", symbol);
                    summary.failed += 1;
                }
            }
        }

        info!(
            updated = summary.updated,
            failed = summary.failed,
            "PriceRefresher: pass complete"
        );
        Some(summary)
    }

    async fn refresh_symbol(&self, symbol: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let quote = self.provider.get_quote(symbol).await?;
        self.database.upsert_quote(&quote).await?;
        Ok(())
    }

    /// Run `refresh_all` on the cron schedule derived from `interval_seconds`.
    pub async fn start(self: &Arc<Self>, interval_seconds: u64) -> Result<(), SchedulerError> {
        let schedule = schedule_for_interval(interval_seconds)?;
        let refresher = Arc::clone(self);

        let handle = tokio::spawn(async move {
            info!("PriceRefresher: started, waiting for cron schedule...");

            loop {
                let mut upcoming = schedule.upcoming(chrono::Utc);
                if let Some(next_tick) = upcoming.next() {
                    let now = chrono::Utc::now();
                    if next_tick > now {
                        let duration = (next_tick - now).to_std().unwrap_or_default();
                        tokio::time::sleep(duration).await;
                    }
                } else {
                    tokio::time::sleep(Duration::from_secs(60)).await;
                    continue;
                }

                if refresher.refresh_all().await.is_none() {
                    debug!("PriceRefresher: previous pass still running, skipping tick");
                }
            }
        });

        {
            let mut h = self.handle.write().await;
            if let Some(previous) = h.replace(handle) {
                previous.abort();
            }
        }

        info!(interval = interval_seconds, "PriceRefresher: scheduled every {}s", interval_seconds);
        Ok(())
    }

    pub async fn stop(&self) {
        let mut handle = self.handle.write().await;
        if let Some(h) = handle.take() {
            h.abort();
            info!("PriceRefresher: stopped");
        }
    }

    pub async fn is_running(&self) -> bool {
        self.handle.read().await.is_some()
    }
}
