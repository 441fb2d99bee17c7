//! fxscope - multi-timeframe forex signal server

pub mod api;
pub mod config;
pub mod error;
pub mod services;
pub mod sources;
pub mod types;

use axum::Router;
use config::Config;
use services::{SignalHistory, SignalStore};
use sources::{CandleSource, TwelveDataClient};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub signal_store: Arc<SignalStore>,
    pub history: Arc<SignalHistory>,
}

impl AppState {
    /// Build state around a candle source.
    pub fn new(config: Config, source: Arc<dyn CandleSource>) -> Self {
        let history = SignalHistory::new(
            config.signal.history_capacity,
            config.signal.win_probability,
        );
        Self::with_history(config, source, history)
    }

    /// Build state around a candle source and an existing history.
    pub fn with_history(
        config: Config,
        source: Arc<dyn CandleSource>,
        history: Arc<SignalHistory>,
    ) -> Self {
        let signal_store = SignalStore::new(source, history.clone(), &config);
        Self {
            config: Arc::new(config),
            signal_store,
            history,
        }
    }

    /// Build state backed by the Twelve Data API.
    pub fn from_config(config: Config) -> Self {
        let source = Arc::new(TwelveDataClient::from_config(&config));
        Self::new(config, source)
    }
}

/// Build the HTTP application.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(api::router())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// Re-export commonly used types
pub use types::*;
