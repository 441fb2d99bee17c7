//! Donchian Channels indicator.

use crate::services::signals::Indicator;
use crate::types::{Band, Candle};

/// Donchian Channels: highest high and lowest low over the lookback window,
/// with the midpoint as the middle line.
pub struct DonchianChannels {
    period: usize,
}

impl Default for DonchianChannels {
    fn default() -> Self {
        Self { period: 20 }
    }
}

impl DonchianChannels {
    pub fn new(period: usize) -> Self {
        Self { period }
    }
}

impl Indicator for DonchianChannels {
    type Output = Band;

    fn id(&self) -> &str {
        "donchian"
    }

    fn name(&self) -> &str {
        "Donchian Channels"
    }

    fn min_periods(&self) -> usize {
        self.period.max(1)
    }

    fn calculate(&self, candles: &[Candle]) -> Option<Band> {
        if candles.len() < self.min_periods() {
            return None;
        }

        let window = &candles[candles.len() - self.min_periods()..];
        let upper = window.iter().map(|c| c.high).fold(f64::MIN, f64::max);
        let lower = window.iter().map(|c| c.low).fold(f64::MAX, f64::min);

        Some(Band {
            upper,
            middle: (upper + lower) / 2.0,
            lower,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::signals::indicators::test_support::uptrend_candles;

    #[test]
    fn test_donchian_id_and_name() {
        let donchian = DonchianChannels::default();
        assert_eq!(donchian.id(), "donchian");
        assert_eq!(donchian.name(), "Donchian Channels");
        assert_eq!(donchian.min_periods(), 20);
    }

    #[test]
    fn test_donchian_insufficient_data() {
        let donchian = DonchianChannels::default();
        assert!(donchian.calculate(&uptrend_candles(19)).is_none());
    }

    #[test]
    fn test_donchian_uses_last_window_only() {
        let donchian = DonchianChannels::new(5);
        let candles = uptrend_candles(30);
        let band = donchian.calculate(&candles).unwrap();

        let window = &candles[25..];
        assert_eq!(band.upper, window[4].high);
        assert_eq!(band.lower, window[0].low);
        assert_eq!(band.middle, (band.upper + band.lower) / 2.0);
    }
}
