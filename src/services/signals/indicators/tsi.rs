//! True Strength Index (TSI) indicator.

use super::ema::ema_series;
use crate::services::signals::Indicator;
use crate::types::Candle;

/// TSI (True Strength Index).
///
/// Double-smoothed price change relative to double-smoothed absolute price
/// change, scaled to [-100, 100]. Positive values indicate upward momentum.
pub struct Tsi {
    long: usize,
    short: usize,
}

impl Default for Tsi {
    fn default() -> Self {
        Self { long: 25, short: 13 }
    }
}

impl Tsi {
    pub fn new(long: usize, short: usize) -> Self {
        Self { long, short }
    }

    fn double_smooth(values: &[f64], long: usize, short: usize) -> Option<f64> {
        let first = ema_series(values, long);
        ema_series(&first, short).last().copied()
    }
}

impl Indicator for Tsi {
    type Output = f64;

    fn id(&self) -> &str {
        "tsi"
    }

    fn name(&self) -> &str {
        "True Strength Index"
    }

    fn min_periods(&self) -> usize {
        // One extra candle for the first price change
        self.long + self.short
    }

    fn calculate(&self, candles: &[Candle]) -> Option<f64> {
        if self.long == 0 || self.short == 0 || candles.len() < self.min_periods() {
            return None;
        }

        let changes: Vec<f64> = candles.windows(2).map(|w| w[1].close - w[0].close).collect();
        let abs_changes: Vec<f64> = changes.iter().map(|c| c.abs()).collect();

        let numerator = Self::double_smooth(&changes, self.long, self.short)?;
        let denominator = Self::double_smooth(&abs_changes, self.long, self.short)?;

        if denominator == 0.0 {
            return None;
        }

        Some(100.0 * numerator / denominator)
    }
}
