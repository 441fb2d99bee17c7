use std::env;
use std::time::Duration;

use crate::services::signals::history::DEFAULT_WIN_PROBABILITY;
use crate::sources::twelvedata::TWELVE_DATA_URL;
use crate::types::Timeframe;

/// Default tradable instruments (kept small for the provider quota).
pub const DEFAULT_PAIRS: [&str; 10] = [
    "EUR/USD", "GBP/USD", "USD/JPY", "USD/CHF", "AUD/USD", "USD/CAD", "NZD/USD", "EUR/JPY",
    "GBP/JPY", "EUR/GBP",
];

/// Signal aggregation and history configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalConfig {
    /// Timeframes analysed for every instrument.
    pub timeframes: Vec<Timeframe>,
    /// Timeframe whose snapshot supplies entry price and volatility sizing.
    pub reference_timeframe: Timeframe,
    /// Stop-loss distance in volatility units.
    pub stop_loss_multiplier: f64,
    /// Take-profit distances in volatility units, nearest first.
    pub take_profit_multipliers: [f64; 3],
    /// Volatility unit used when the channel width is unavailable or degenerate.
    pub atr_fallback: f64,
    /// Maximum number of retained history entries.
    pub history_capacity: usize,
    /// Probability used by the placeholder win draw.
    pub win_probability: f64,
    /// Decimal places used when presenting prices.
    pub price_precision: usize,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            timeframes: Timeframe::ALL.to_vec(),
            reference_timeframe: Timeframe::OneMinute,
            stop_loss_multiplier: 1.2,
            take_profit_multipliers: [0.5, 0.8, 1.2],
            atr_fallback: 0.001,
            history_capacity: 20,
            win_probability: DEFAULT_WIN_PROBABILITY,
            price_precision: 5,
        }
    }
}

/// Indicator periods.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorConfig {
    pub keltner_ma_period: usize,
    pub keltner_atr_period: usize,
    pub keltner_multiplier: f64,
    pub donchian_period: usize,
    pub tsi_long: usize,
    pub tsi_short: usize,
    pub cmo_period: usize,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            keltner_ma_period: 20,
            keltner_atr_period: 10,
            keltner_multiplier: 2.0,
            donchian_period: 20,
            tsi_long: 25,
            tsi_short: 13,
            cmo_period: 14,
        }
    }
}

/// Market data request limits.
#[derive(Debug, Clone, PartialEq)]
pub struct RateLimitConfig {
    /// Requests allowed per window.
    pub max_requests: u32,
    /// Length of the sliding window.
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        // Twelve Data free tier
        Self {
            max_requests: 8,
            window: Duration::from_secs(60),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Twelve Data API key.
    pub twelve_data_api_key: Option<String>,
    /// Twelve Data base URL.
    pub twelve_data_url: String,
    /// Candles requested per timeframe.
    pub candle_output_size: u32,
    /// Tradable instruments.
    pub pairs: Vec<String>,
    /// How long computed snapshots are reused (zero disables caching).
    pub snapshot_cache_ttl: Duration,
    pub rate_limit: RateLimitConfig,
    pub signal: SignalConfig,
    pub indicators: IndicatorConfig,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        // Format: "EUR/USD,GBP/USD"
        let pairs = env::var("FX_PAIRS")
            .ok()
            .map(|s| parse_pairs(&s))
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| DEFAULT_PAIRS.iter().map(|p| p.to_string()).collect());

        let defaults = SignalConfig::default();
        let signal = SignalConfig {
            reference_timeframe: env::var("REFERENCE_TIMEFRAME")
                .ok()
                .and_then(|v| Timeframe::from_str(&v))
                .unwrap_or(defaults.reference_timeframe),
            history_capacity: env_parse("HISTORY_CAPACITY")
                .filter(|c: &usize| *c > 0)
                .unwrap_or(defaults.history_capacity),
            win_probability: env::var("WIN_PROBABILITY")
                .ok()
                .and_then(|v| parse_probability(&v))
                .unwrap_or(defaults.win_probability),
            price_precision: env_parse("PRICE_PRECISION").unwrap_or(defaults.price_precision),
            ..defaults
        };

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env_parse("PORT").unwrap_or(3001),
            twelve_data_api_key: env::var("TWELVE_DATA_API_KEY").ok(),
            twelve_data_url: env::var("TWELVE_DATA_URL")
                .unwrap_or_else(|_| TWELVE_DATA_URL.to_string()),
            candle_output_size: env_parse("CANDLE_OUTPUT_SIZE").unwrap_or(100),
            pairs,
            snapshot_cache_ttl: Duration::from_secs(
                env_parse("SNAPSHOT_CACHE_TTL_SECS").unwrap_or(30),
            ),
            rate_limit: RateLimitConfig {
                max_requests: env_parse("REQUESTS_PER_MINUTE")
                    .filter(|n: &u32| *n > 0)
                    .unwrap_or(8),
                window: Duration::from_secs(60),
            },
            signal,
            indicators: IndicatorConfig::default(),
        }
    }

    /// Look up a configured pair case-insensitively, returning its canonical spelling.
    pub fn find_pair(&self, pair: &str) -> Option<&str> {
        let wanted = pair.trim();
        self.pairs
            .iter()
            .find(|p| p.eq_ignore_ascii_case(wanted))
            .map(String::as_str)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

/// Finite probabilities clamped to [0, 1]; anything else is rejected.
fn parse_probability(s: &str) -> Option<f64> {
    s.trim()
        .parse::<f64>()
        .ok()
        .filter(|p| p.is_finite())
        .map(|p| p.clamp(0.0, 1.0))
}

fn parse_pairs(s: &str) -> Vec<String> {
    s.split(',')
        .map(|p| p.trim().to_uppercase())
        .filter(|p| !p.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            host: "127.0.0.1".to_string(),
            port: 3001,
            twelve_data_api_key: None,
            twelve_data_url: "http://localhost".to_string(),
            candle_output_size: 100,
            pairs: DEFAULT_PAIRS.iter().map(|p| p.to_string()).collect(),
            snapshot_cache_ttl: Duration::ZERO,
            rate_limit: RateLimitConfig::default(),
            signal: SignalConfig::default(),
            indicators: IndicatorConfig::default(),
        }
    }

    #[test]
    fn test_signal_config_defaults() {
        let config = SignalConfig::default();
        assert_eq!(config.timeframes.len(), 7);
        assert_eq!(config.reference_timeframe, Timeframe::OneMinute);
        assert_eq!(config.take_profit_multipliers, [0.5, 0.8, 1.2]);
        assert_eq!(config.stop_loss_multiplier, 1.2);
        assert_eq!(config.atr_fallback, 0.001);
        assert_eq!(config.history_capacity, 20);
        assert_eq!(config.price_precision, 5);
    }

    #[test]
    fn test_indicator_config_defaults() {
        let config = IndicatorConfig::default();
        assert_eq!(config.keltner_ma_period, 20);
        assert_eq!(config.donchian_period, 20);
        assert_eq!((config.tsi_long, config.tsi_short), (25, 13));
        assert_eq!(config.cmo_period, 14);
    }

    #[test]
    fn test_find_pair_case_insensitive() {
        let config = test_config();
        assert_eq!(config.find_pair("eur/usd"), Some("EUR/USD"));
        assert_eq!(config.find_pair(" GBP/JPY "), Some("GBP/JPY"));
        assert_eq!(config.find_pair("BTC/USD"), None);
        assert_eq!(config.find_pair(""), None);
    }

    #[test]
    fn test_parse_probability() {
        assert_eq!(parse_probability("0.6"), Some(0.6));
        assert_eq!(parse_probability(" 1.5 "), Some(1.0));
        assert_eq!(parse_probability("-2"), Some(0.0));
        assert_eq!(parse_probability("NaN"), None);
        assert_eq!(parse_probability("inf"), None);
        assert_eq!(parse_probability("-infinity"), None);
        assert_eq!(parse_probability("often"), None);
    }

    #[test]
    fn test_parse_pairs() {
        assert_eq!(
            parse_pairs("eur/usd, GBP/USD,,"),
            vec!["EUR/USD".to_string(), "GBP/USD".to_string()]
        );
        assert!(parse_pairs(" , ").is_empty());
    }
}
