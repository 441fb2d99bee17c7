//! Sliding-window request limiter for the market data provider.

use std::collections::VecDeque;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

use crate::config::RateLimitConfig;

/// Allows at most `max_requests` acquisitions per sliding window.
#[derive(Debug)]
pub struct RateLimiter {
    config: RateLimitConfig,
    requests: Mutex<VecDeque<Instant>>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            requests: Mutex::new(VecDeque::new()),
        }
    }

    /// Wait until a request slot is free and claim it.
    pub async fn acquire(&self) {
        loop {
            let wait = {
                let mut requests = self.requests.lock().await;
                let now = Instant::now();

                // Remove entries older than the window
                while requests
                    .front()
                    .is_some_and(|t| now.duration_since(*t) >= self.config.window)
                {
                    requests.pop_front();
                }

                if (requests.len() as u32) < self.config.max_requests.max(1) {
                    requests.push_back(now);
                    return;
                }

                match requests.front() {
                    Some(oldest) => (*oldest + self.config.window).saturating_duration_since(now),
                    None => Duration::ZERO,
                }
            };

            debug!("Market data rate limit reached, waiting {:?}", wait);
            tokio::time::sleep(wait).await;
        }
    }

}
