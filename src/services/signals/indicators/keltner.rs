//! Keltner Channels indicator.

use super::ema::ema;
use crate::services::signals::Indicator;
use crate::types::{Band, Candle};

/// Keltner Channels.
///
/// Consists of:
/// - Middle line: EMA of close
/// - Upper line: middle + multiplier * ATR
/// - Lower line: middle - multiplier * ATR
///
/// The channel width is what the aggregator sizes stops and targets with.
pub struct KeltnerChannels {
    ma_period: usize,
    atr_period: usize,
    multiplier: f64,
}

impl Default for KeltnerChannels {
    fn default() -> Self {
        Self {
            ma_period: 20,
            atr_period: 10,
            multiplier: 2.0,
        }
    }
}

impl KeltnerChannels {
    pub fn new(ma_period: usize, atr_period: usize, multiplier: f64) -> Self {
        Self {
            ma_period,
            atr_period,
            multiplier,
        }
    }

    /// Calculate True Range.
    fn true_range(current: &Candle, previous: &Candle) -> f64 {
        let hl = current.high - current.low;
        let hc = (current.high - previous.close).abs();
        let lc = (current.low - previous.close).abs();
        hl.max(hc).max(lc)
    }

    /// Average True Range with Wilder's smoothing.
    fn average_true_range(candles: &[Candle], period: usize) -> Option<f64> {
        if period == 0 || candles.len() < period + 1 {
            return None;
        }

        let true_ranges: Vec<f64> = candles
            .windows(2)
            .map(|w| Self::true_range(&w[1], &w[0]))
            .collect();

        let initial_atr = true_ranges.iter().take(period).sum::<f64>() / period as f64;

        let mut atr = initial_atr;
        for tr in true_ranges.iter().skip(period) {
            atr = (atr * (period - 1) as f64 + tr) / period as f64;
        }

        Some(atr)
    }
}

impl Indicator for KeltnerChannels {
    type Output = Band;

    fn id(&self) -> &str {
        "keltner"
    }

    fn name(&self) -> &str {
        "Keltner Channels"
    }

    fn min_periods(&self) -> usize {
        self.ma_period.max(self.atr_period + 1)
    }

    fn calculate(&self, candles: &[Candle]) -> Option<Band> {
        if candles.len() < self.min_periods() {
            return None;
        }

        let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
        let middle = ema(&closes, self.ma_period)?;
        let atr = Self::average_true_range(candles, self.atr_period)?;
        let offset = self.multiplier * atr;

        Some(Band {
            upper: middle + offset,
            middle,
            lower: middle - offset,
        })
    }
}
