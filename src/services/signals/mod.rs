//! Trading signals service module.
//!
//! Provides the indicator calculations, multi-timeframe aggregation and the
//! bounded signal history.

pub mod aggregator;
pub mod history;
pub mod indicators;
pub mod store;

pub use aggregator::{SignalAggregator, Vote, VoteTally};
pub use history::{FixedOutcome, HistoryLedger, OutcomeSampler, RandomOutcome, SignalHistory};
pub use indicators::IndicatorSet;
pub use store::{Analysis, SignalStore};

use crate::types::Candle;

/// Trait for implementing technical indicators.
pub trait Indicator: Send + Sync {
    /// Value produced from a candle series.
    type Output;

    /// Unique identifier for this indicator.
    fn id(&self) -> &str;

    /// Human-readable name.
    fn name(&self) -> &str;

    /// Minimum number of candle periods required for calculation.
    fn min_periods(&self) -> usize;

    /// Calculate the indicator from ascending candle data.
    /// Returns None if insufficient data or calculation fails.
    fn calculate(&self, candles: &[Candle]) -> Option<Self::Output>;
}
