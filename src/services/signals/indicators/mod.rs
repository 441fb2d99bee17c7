//! Technical indicator implementations.

pub mod cmo;
pub mod donchian;
pub mod ema;
pub mod keltner;
pub mod tsi;

pub use cmo::Cmo;
pub use donchian::DonchianChannels;
pub use keltner::KeltnerChannels;
pub use tsi::Tsi;

use super::Indicator;
use crate::config::IndicatorConfig;
use crate::types::{Candle, IndicatorSnapshot};

/// The four indicators summarised into every [`IndicatorSnapshot`].
pub struct IndicatorSet {
    keltner: KeltnerChannels,
    donchian: DonchianChannels,
    tsi: Tsi,
    cmo: Cmo,
}

impl IndicatorSet {
    pub fn new(config: &IndicatorConfig) -> Self {
        Self {
            keltner: KeltnerChannels::new(
                config.keltner_ma_period,
                config.keltner_atr_period,
                config.keltner_multiplier,
            ),
            donchian: DonchianChannels::new(config.donchian_period),
            tsi: Tsi::new(config.tsi_long, config.tsi_short),
            cmo: Cmo::new(config.cmo_period),
        }
    }

    /// Summarise an ascending candle series.
    pub fn snapshot(&self, candles: &[Candle]) -> IndicatorSnapshot {
        IndicatorSnapshot {
            channel_band: self.keltner.calculate(candles),
            range_band: self.donchian.calculate(candles),
            momentum: self.tsi.calculate(candles).filter(|v| v.is_finite()),
            oscillator: self.cmo.calculate(candles).filter(|v| v.is_finite()),
        }
    }

    /// Fewest candles for which every indicator produces a value.
    pub fn min_periods(&self) -> usize {
        self.keltner
            .min_periods()
            .max(self.donchian.min_periods())
            .max(self.tsi.min_periods())
            .max(self.cmo.min_periods())
    }
}

impl Default for IndicatorSet {
    fn default() -> Self {
        Self::new(&IndicatorConfig::default())
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::types::Candle;

    pub fn uptrend_candles(count: usize) -> Vec<Candle> {
        (0..count)
            .map(|i| {
                let base = 100.0 + i as f64 * 1.5;
                Candle {
                    time: 1_000_000 + i as i64 * 60_000,
                    open: base,
                    high: base + 2.0,
                    low: base - 1.0,
                    close: base + 1.0,
                }
            })
            .collect()
    }

    pub fn downtrend_candles(count: usize) -> Vec<Candle> {
        (0..count)
            .map(|i| {
                let base = 200.0 - i as f64 * 1.5;
                Candle {
                    time: 1_000_000 + i as i64 * 60_000,
                    open: base,
                    high: base + 1.0,
                    low: base - 2.0,
                    close: base - 1.0,
                }
            })
            .collect()
    }

    /// Candles that never move, each spanning `range` around `price`.
    pub fn flat_candles(count: usize, price: f64, range: f64) -> Vec<Candle> {
        (0..count)
            .map(|i| Candle {
                time: 1_000_000 + i as i64 * 60_000,
                open: price,
                high: price + range / 2.0,
                low: price - range / 2.0,
                close: price,
            })
            .collect()
    }
}
