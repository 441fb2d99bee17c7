//! Chande Momentum Oscillator (CMO) indicator.

use crate::services::signals::Indicator;
use crate::types::Candle;

/// CMO (Chande Momentum Oscillator).
///
/// `100 * (sum of gains - sum of losses) / (sum of gains + sum of losses)`
/// over the last `period` close-to-close changes. Bounded to [-100, 100].
pub struct Cmo {
    period: usize,
}

impl Default for Cmo {
    fn default() -> Self {
        Self { period: 14 }
    }
}

impl Cmo {
    pub fn new(period: usize) -> Self {
        Self { period }
    }
}

impl Indicator for Cmo {
    type Output = f64;

    fn id(&self) -> &str {
        "cmo"
    }

    fn name(&self) -> &str {
        "Chande Momentum Oscillator"
    }

    fn min_periods(&self) -> usize {
        self.period + 1
    }

    fn calculate(&self, candles: &[Candle]) -> Option<f64> {
        if self.period == 0 || candles.len() < self.min_periods() {
            return None;
        }

        let window = &candles[candles.len() - self.min_periods()..];
        let (gains, losses) = window.windows(2).fold((0.0, 0.0), |(up, down), w| {
            let change = w[1].close - w[0].close;
            if change > 0.0 {
                (up + change, down)
            } else {
                (up, down - change)
            }
        });

        let total = gains + losses;
        if total == 0.0 {
            return None;
        }

        Some(100.0 * (gains - losses) / total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::signals::indicators::test_support::{
        downtrend_candles, flat_candles, uptrend_candles,
    };

    #[test]
    fn test_cmo_id_and_min_periods() {
        let cmo = Cmo::default();
        assert_eq!(cmo.id(), "cmo");
        assert_eq!(cmo.min_periods(), 15);
        assert_eq!(Cmo::new(9).name(), Cmo::default().name());
        assert_eq!(Cmo::new(9).min_periods(), 10);
    }

    #[test]
    fn test_cmo_insufficient_data() {
        assert!(Cmo::default().calculate(&uptrend_candles(14)).is_none());
    }

    #[test]
    fn test_cmo_extremes() {
        let up = Cmo::default().calculate(&uptrend_candles(30)).unwrap();
        let down = Cmo::default().calculate(&downtrend_candles(30)).unwrap();
        assert!((up - 100.0).abs() < 1e-9);
        assert!((down + 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_cmo_mixed_changes() {
        let mut candles = flat_candles(3, 10.0, 0.5);
        candles[1].close = 12.0; // +2
        candles[2].close = 11.0; // -1
        let value = Cmo::new(2).calculate(&candles).unwrap();
        assert!((value - 100.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_cmo_flat_market_is_absent() {
        assert!(Cmo::default().calculate(&flat_candles(30, 1.1, 0.001)).is_none());
    }
}
