use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::Timeframe;

/// Upper/middle/lower price envelope.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

impl Band {
    /// Distance between the outer levels.
    pub fn width(&self) -> f64 {
        (self.upper - self.lower).abs()
    }
}

/// Indicator summary for one timeframe.
///
/// Every field is optional: an indicator that could not be computed
/// (usually because the candle history is too short) is absent and casts
/// no vote. It is never treated as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorSnapshot {
    /// Keltner channel.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_band: Option<Band>,
    /// Donchian channel.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range_band: Option<Band>,
    /// True Strength Index.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub momentum: Option<f64>,
    /// Chande Momentum Oscillator, nominally in [-100, 100].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oscillator: Option<f64>,
}

impl IndicatorSnapshot {
    /// True when no indicator produced a value.
    pub fn is_empty(&self) -> bool {
        self.channel_band.is_none()
            && self.range_band.is_none()
            && self.momentum.is_none()
            && self.oscillator.is_none()
    }
}

/// Indicator snapshots keyed by timeframe, iterated shortest first.
pub type TimeframeSet = BTreeMap<Timeframe, IndicatorSnapshot>;

/// Directional decision produced by the aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Bias {
    Buy,
    Sell,
    #[serde(rename = "No Trade")]
    NoTrade,
    #[serde(rename = "No Data")]
    NoData,
}

impl Bias {
    /// Whether this bias carries a stop-loss and take-profit targets.
    pub fn is_actionable(&self) -> bool {
        matches!(self, Bias::Buy | Bias::Sell)
    }

    /// The opposite direction; abstentions map to themselves.
    pub fn flipped(&self) -> Self {
        match self {
            Bias::Buy => Bias::Sell,
            Bias::Sell => Bias::Buy,
            other => *other,
        }
    }

    /// Get display label for this bias.
    pub fn label(&self) -> &'static str {
        match self {
            Bias::Buy => "Buy",
            Bias::Sell => "Sell",
            Bias::NoTrade => "No Trade",
            Bias::NoData => "No Data",
        }
    }
}

impl fmt::Display for Bias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Aggregated trade decision at full floating-point precision.
///
/// `stop_loss` is `Some` and `take_profits` holds three targets exactly when
/// the bias is actionable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeSignal {
    pub bias: Bias,
    /// Present whenever a reference snapshot existed, even for `NoTrade`.
    pub entry_price: Option<f64>,
    pub stop_loss: Option<f64>,
    pub take_profits: Vec<f64>,
}

impl TradeSignal {
    /// Signal for an empty timeframe set.
    pub fn no_data() -> Self {
        Self {
            bias: Bias::NoData,
            entry_price: None,
            stop_loss: None,
            take_profits: Vec::new(),
        }
    }

    /// Render prices with a fixed number of decimals for presentation.
    pub fn to_view(&self, precision: usize) -> SignalView {
        let fmt = |v: f64| format!("{:.*}", precision, v);
        SignalView {
            bias: self.bias,
            entry: self.entry_price.map(fmt),
            sl: self.stop_loss.map(fmt),
            tps: self.take_profits.iter().copied().map(fmt).collect(),
        }
    }
}

/// Presentation form of a [`TradeSignal`] with rounded, stringified prices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalView {
    pub bias: Bias,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry: Option<String>,
    pub sl: Option<String>,
    pub tps: Vec<String>,
}
