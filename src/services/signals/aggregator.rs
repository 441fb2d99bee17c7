//! Multi-timeframe signal aggregation.
//!
//! Every timeframe casts at most one directional vote from its momentum and
//! oscillator readings. The majority decides the bias and the reference
//! (fastest) timeframe supplies entry price and the volatility unit used to
//! place the stop-loss and take-profit levels.

use crate::config::SignalConfig;
use crate::types::{Bias, IndicatorSnapshot, TimeframeSet, TradeSignal};

/// Direction a single timeframe votes for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vote {
    Buy,
    Sell,
}

impl Vote {
    /// Vote cast by one snapshot.
    ///
    /// Both readings must be present, non-zero and agree in sign.
    pub fn cast(snapshot: &IndicatorSnapshot) -> Option<Self> {
        match (snapshot.momentum, snapshot.oscillator) {
            (Some(m), Some(o)) if m > 0.0 && o > 0.0 => Some(Vote::Buy),
            (Some(m), Some(o)) if m < 0.0 && o < 0.0 => Some(Vote::Sell),
            _ => None,
        }
    }
}

/// Buy and sell vote counts across a timeframe set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VoteTally {
    pub buy: usize,
    pub sell: usize,
}

impl VoteTally {
    pub fn count(snapshots: &TimeframeSet) -> Self {
        snapshots
            .values()
            .filter_map(Vote::cast)
            .fold(Self::default(), |mut tally, vote| {
                match vote {
                    Vote::Buy => tally.buy += 1,
                    Vote::Sell => tally.sell += 1,
                }
                tally
            })
    }

    /// Majority decision; ties abstain.
    pub fn bias(&self) -> Bias {
        use std::cmp::Ordering;

        match self.buy.cmp(&self.sell) {
            Ordering::Greater => Bias::Buy,
            Ordering::Less => Bias::Sell,
            Ordering::Equal => Bias::NoTrade,
        }
    }
}

/// Reduces per-timeframe indicator snapshots to a single [`TradeSignal`].
///
/// Stateless; safe to share across threads without synchronization.
#[derive(Debug, Clone, Default)]
pub struct SignalAggregator {
    config: SignalConfig,
}

impl SignalAggregator {
    pub fn new(config: SignalConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SignalConfig {
        &self.config
    }

    /// Aggregate a timeframe set into a trade decision. Never fails.
    pub fn aggregate(&self, snapshots: &TimeframeSet) -> TradeSignal {
        if snapshots.is_empty() {
            return TradeSignal::no_data();
        }

        let bias = VoteTally::count(snapshots).bias();

        // Unreachable for a non-empty set
        let Some(reference) = self.reference_snapshot(snapshots) else {
            return TradeSignal::no_data();
        };

        let entry = Self::entry_price(reference);
        let atr = self.volatility_unit(reference);
        let [tp1, tp2, tp3] = self.config.take_profit_multipliers;
        let sl = self.config.stop_loss_multiplier;

        let (stop_loss, take_profits) = match bias {
            Bias::Buy => (
                Some(entry - sl * atr),
                vec![entry + tp1 * atr, entry + tp2 * atr, entry + tp3 * atr],
            ),
            Bias::Sell => (
                Some(entry + sl * atr),
                vec![entry - tp1 * atr, entry - tp2 * atr, entry - tp3 * atr],
            ),
            Bias::NoTrade | Bias::NoData => (None, Vec::new()),
        };

        TradeSignal {
            bias,
            entry_price: Some(entry),
            stop_loss,
            take_profits,
        }
    }

    /// Snapshot of the configured reference timeframe, else the first in
    /// iteration order.
    pub fn reference_snapshot<'a>(
        &self,
        snapshots: &'a TimeframeSet,
    ) -> Option<&'a IndicatorSnapshot> {
        snapshots
            .get(&self.config.reference_timeframe)
            .or_else(|| snapshots.values().next())
    }

    fn entry_price(reference: &IndicatorSnapshot) -> f64 {
        reference
            .channel_band
            .map(|b| b.middle)
            .or(reference.range_band.map(|b| b.middle))
            .unwrap_or(0.0)
    }

    fn volatility_unit(&self, reference: &IndicatorSnapshot) -> f64 {
        match reference.channel_band.map(|b| b.width()) {
            Some(width) if width.is_finite() && width > 0.0 => width,
            _ => self.config.atr_fallback,
        }
    }
}
