//! Twelve Data API client for forex candles.
//!
//! Free tier is limited to 8 requests per minute and 800 per day, so every
//! request goes through the shared [`RateLimiter`].

use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::{CandleSource, RateLimiter};
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::types::{Candle, Timeframe};

pub const TWELVE_DATA_URL: &str = "https://api.twelvedata.com";

/// Time series response.
#[derive(Debug, Clone, Deserialize)]
pub struct TimeSeriesResponse {
    pub status: Option<String>,
    pub message: Option<String>,
    pub code: Option<u16>,
    pub values: Option<Vec<TimeSeriesValue>>,
}

/// Individual time series data point. Prices arrive as strings.
#[derive(Debug, Clone, Deserialize)]
pub struct TimeSeriesValue {
    pub datetime: String,
    pub open: String,
    pub high: String,
    pub low: String,
    pub close: String,
}

impl TimeSeriesValue {
    fn to_candle(&self) -> Option<Candle> {
        let price = |s: &str| s.trim().parse::<f64>().ok().filter(|v| v.is_finite() && *v > 0.0);

        Some(Candle {
            time: parse_datetime(&self.datetime)?,
            open: price(&self.open)?,
            high: price(&self.high)?,
            low: price(&self.low)?,
            close: price(&self.close)?,
        })
    }
}

/// Parse "2024-01-15 10:30:00" or "2024-01-15" (UTC) into unix millis.
pub fn parse_datetime(s: &str) -> Option<i64> {
    let s = s.trim();
    if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.and_utc().timestamp_millis());
    }
    let date = chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()?;
    Some(date.and_hms_opt(0, 0, 0)?.and_utc().timestamp_millis())
}

/// Provider symbol for a pair ("EUR/USD" -> "EURUSD").
pub fn provider_symbol(pair: &str) -> String {
    pair.replace('/', "").trim().to_uppercase()
}

/// Convert a response into ascending candles.
pub fn parse_time_series(response: TimeSeriesResponse) -> Result<Vec<Candle>> {
    if response.status.as_deref() == Some("error") {
        let message = response.message.unwrap_or_else(|| "Unknown error".to_string());
        return Err(AppError::ExternalApi(match response.code {
            Some(code) => format!("{} ({})", message, code),
            None => message,
        }));
    }

    let values = response
        .values
        .ok_or_else(|| AppError::ExternalApi("No data".to_string()))?;

    let mut candles: Vec<Candle> = values.iter().filter_map(TimeSeriesValue::to_candle).collect();

    // Provider returns newest first
    candles.sort_by_key(|c| c.time);

    Ok(candles)
}

/// Twelve Data API client.
pub struct TwelveDataClient {
    client: Client,
    api_key: String,
    base_url: String,
    output_size: u32,
    limiter: RateLimiter,
}

impl TwelveDataClient {
    /// Create a new Twelve Data client.
    pub fn new(api_key: String, base_url: String, output_size: u32, limiter: RateLimiter) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .unwrap_or_default();

        Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            output_size,
            limiter,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config
                .twelve_data_api_key
                .clone()
                .unwrap_or_else(|| "demo".to_string()),
            config.twelve_data_url.clone(),
            config.candle_output_size,
            RateLimiter::new(config.rate_limit.clone()),
        )
    }

    fn time_series_url(&self, pair: &str, timeframe: Timeframe) -> String {
        format!(
            "{}/time_series?symbol={}&interval={}&outputsize={}&apikey={}",
            self.base_url,
            provider_symbol(pair),
            timeframe.as_str(),
            self.output_size,
            self.api_key
        )
    }
}

#[axum::async_trait]
impl CandleSource for TwelveDataClient {
    async fn fetch_candles(&self, pair: &str, timeframe: Timeframe) -> Result<Vec<Candle>> {
        self.limiter.acquire().await;

        let response = self
            .client
            .get(self.time_series_url(pair, timeframe))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::ExternalApi(format!(
                "Twelve Data returned {}",
                response.status()
            )));
        }

        let body: TimeSeriesResponse = response.json().await?;
        let candles = parse_time_series(body)?;

        debug!("Fetched {} {} candles for {}", candles.len(), timeframe, pair);

        Ok(candles)
    }
}
