//! Signal store: fetches candles, computes snapshots, aggregates and records.

use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::services::signals::indicators::IndicatorSet;
use crate::services::signals::{SignalAggregator, SignalHistory};
use crate::services::SnapshotCache;
use crate::sources::CandleSource;
use crate::types::{HistoryEntry, HistoryStats, Timeframe, TimeframeSet, TradeSignal};

/// Result of analysing one instrument.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    pub pair: String,
    pub timeframes: TimeframeSet,
    pub signal: TradeSignal,
    pub entry: HistoryEntry,
    pub stats: HistoryStats,
}

/// Store for computing trading signals and recording them in the history.
pub struct SignalStore {
    source: Arc<dyn CandleSource>,
    indicators: IndicatorSet,
    aggregator: SignalAggregator,
    history: Arc<SignalHistory>,
    timeframes: Vec<Timeframe>,
    cache: SnapshotCache,
}

impl SignalStore {
    /// Create a new signal store.
    pub fn new(
        source: Arc<dyn CandleSource>,
        history: Arc<SignalHistory>,
        config: &Config,
    ) -> Arc<Self> {
        Arc::new(Self {
            source,
            indicators: IndicatorSet::new(&config.indicators),
            aggregator: SignalAggregator::new(config.signal.clone()),
            history,
            timeframes: config.signal.timeframes.clone(),
            cache: SnapshotCache::new(config.snapshot_cache_ttl),
        })
    }

    /// Analyse a pair, record the resulting signal and return everything.
    pub async fn analyze(&self, pair: &str) -> Result<Analysis> {
        let timeframes = self.timeframe_set(pair).await?;
        let signal = self.aggregator.aggregate(&timeframes);

        info!(
            "{} signal for {} from {} timeframes",
            signal.bias,
            pair,
            timeframes.len()
        );

        let (entry, stats) = self.history.record(pair, signal.clone());

        Ok(Analysis {
            pair: pair.to_string(),
            timeframes,
            signal,
            entry,
            stats,
        })
    }

    /// Indicator snapshots for a pair, served from cache when fresh.
    pub async fn timeframe_set(&self, pair: &str) -> Result<TimeframeSet> {
        if let Some(cached) = self.cache.get(pair) {
            debug!("Using cached snapshots for {}", pair);
            return Ok(cached);
        }

        let set = self.compute_timeframe_set(pair).await?;
        self.cache.insert(pair, set.clone());
        Ok(set)
    }

    /// Fetch every configured timeframe and summarise it.
    ///
    /// Failed fetches and series too short for any indicator are left out of
    /// the set. Fails only when every fetch failed.
    async fn compute_timeframe_set(&self, pair: &str) -> Result<TimeframeSet> {
        let mut set = TimeframeSet::new();
        let mut last_error: Option<AppError> = None;
        let mut fetched = 0usize;

        // Sequential on purpose: the provider quota is per minute
        for &timeframe in &self.timeframes {
            let candles = match self.source.fetch_candles(pair, timeframe).await {
                Ok(candles) => candles,
                Err(e) => {
                    warn!("Failed to fetch {} candles for {}: {}", timeframe, pair, e);
                    last_error = Some(e);
                    continue;
                }
            };
            fetched += 1;

            let snapshot = self.indicators.snapshot(&candles);
            if snapshot.is_empty() {
                debug!(
                    "{} {} candles for {} - not enough for any indicator",
                    candles.len(),
                    timeframe,
                    pair
                );
                continue;
            }
            if candles.len() < self.indicators.min_periods() {
                debug!(
                    "Partial {} snapshot for {}: {} of {} candles",
                    timeframe,
                    pair,
                    candles.len(),
                    self.indicators.min_periods()
                );
            }

            set.insert(timeframe, snapshot);
        }

        if fetched == 0 {
            if let Some(e) = last_error {
                return Err(e);
            }
        }

        Ok(set)
    }

    /// Drop cached snapshots for a pair.
    pub fn invalidate(&self, pair: &str) -> bool {
        self.cache.invalidate(pair)
    }

    /// Remove expired cache entries.
    pub fn cleanup_cache(&self) -> usize {
        self.cache.purge_expired()
    }

    pub fn history(&self) -> &Arc<SignalHistory> {
        &self.history
    }

    /// Pairs with cached snapshots, stale ones included.
    pub fn cached_pairs(&self) -> usize {
        self.cache.len()
    }
}
