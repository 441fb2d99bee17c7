use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{SignalView, TradeSignal};

/// A recorded signal for an instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: Uuid,
    pub instrument: String,
    pub signal: TradeSignal,
    pub recorded_at: DateTime<Utc>,
}

impl HistoryEntry {
    /// Create a new entry stamped with the current time.
    pub fn new(instrument: impl Into<String>, signal: TradeSignal) -> Self {
        Self {
            id: Uuid::new_v4(),
            instrument: instrument.into(),
            signal,
            recorded_at: Utc::now(),
        }
    }

    /// Whether the recorded signal counts as a trade.
    pub fn is_trade(&self) -> bool {
        self.signal.bias.is_actionable()
    }

    /// Presentation form with rounded prices.
    pub fn to_view(&self, precision: usize) -> HistoryEntryView {
        HistoryEntryView {
            id: self.id,
            pair: self.instrument.clone(),
            time: self.recorded_at,
            signal: self.signal.to_view(precision),
        }
    }
}

/// Presentation form of a [`HistoryEntry`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntryView {
    pub id: Uuid,
    pub pair: String,
    pub time: DateTime<Utc>,
    #[serde(flatten)]
    pub signal: SignalView,
}

/// Derived history statistics.
///
/// `win_count` is produced by a placeholder draw, not by tracking real trade
/// outcomes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryStats {
    pub trade_count: u32,
    pub win_count: u32,
    pub win_rate_percent: u32,
}

impl HistoryStats {
    /// Build statistics from counts, rounding the win rate to a whole percent.
    pub fn from_counts(trade_count: u32, win_count: u32) -> Self {
        let win_count = win_count.min(trade_count);
        let win_rate_percent = if trade_count == 0 {
            0
        } else {
            (100.0 * win_count as f64 / trade_count as f64).round() as u32
        };
        Self {
            trade_count,
            win_count,
            win_rate_percent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Bias;

    #[test]
    fn test_stats_from_counts() {
        assert_eq!(HistoryStats::from_counts(0, 0).win_rate_percent, 0);
        assert_eq!(HistoryStats::from_counts(3, 2).win_rate_percent, 67);
        assert_eq!(HistoryStats::from_counts(8, 1).win_rate_percent, 13);
        assert_eq!(HistoryStats::from_counts(4, 4).win_rate_percent, 100);
    }

    #[test]
    fn test_stats_clamps_wins_to_trades() {
        let stats = HistoryStats::from_counts(2, 5);
        assert_eq!(stats.win_count, 2);
        assert_eq!(stats.win_rate_percent, 100);
    }

    #[test]
    fn test_entry_view_flattens_signal() {
        let entry = HistoryEntry::new("EUR/USD", TradeSignal::no_data());
        assert!(!entry.is_trade());

        let json = serde_json::to_value(entry.to_view(5)).unwrap();
        assert_eq!(json["pair"], "EUR/USD");
        assert_eq!(json["bias"], "No Data");
        assert!(json["time"].is_string());
    }

    #[test]
    fn test_entry_is_trade() {
        let signal = TradeSignal {
            bias: Bias::Sell,
            entry_price: Some(1.0),
            stop_loss: Some(1.1),
            take_profits: vec![0.95, 0.92, 0.88],
        };
        assert!(HistoryEntry::new("GBP/USD", signal).is_trade());
    }
}
