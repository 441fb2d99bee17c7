pub mod rate_limit;
pub mod twelvedata;

pub use rate_limit::RateLimiter;
pub use twelvedata::TwelveDataClient;

use crate::error::Result;
use crate::types::{Candle, Timeframe};

/// Provider of OHLC candle series.
#[axum::async_trait]
pub trait CandleSource: Send + Sync {
    /// Fetch candles for a pair and timeframe, ascending by time.
    async fn fetch_candles(&self, pair: &str, timeframe: Timeframe) -> Result<Vec<Candle>>;
}
