//! Liveness endpoint.

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub pairs: usize,
    pub history_entries: usize,
    pub snapshot_cache: bool,
    pub cached_pairs: usize,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        pairs: state.config.pairs.len(),
        history_entries: state.history.len(),
        snapshot_cache: !state.config.snapshot_cache_ttl.is_zero(),
        cached_pairs: state.signal_store.cached_pairs(),
    })
}
