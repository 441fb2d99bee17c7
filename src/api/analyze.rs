//! Analysis endpoint.

use axum::{extract::State, routing::post, Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::types::{HistoryStats, SignalView, TimeframeSet};
use crate::AppState;

/// Request body for `POST /analyze`.
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub pair: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    pub pair: String,
    /// Indicator snapshots per timeframe, shortest first.
    pub timeframes: TimeframeSet,
    pub signal: SignalView,
    pub history_id: Uuid,
    pub recorded_at: DateTime<Utc>,
    pub stats: HistoryStats,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/analyze", post(analyze))
}

/// Analyse a pair across all configured timeframes and record the signal.
async fn analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>> {
    if request.pair.trim().is_empty() {
        return Err(AppError::BadRequest("Missing pair".to_string()));
    }

    let pair = state
        .config
        .find_pair(&request.pair)
        .ok_or_else(|| AppError::BadRequest(format!("Unsupported pair: {}", request.pair)))?
        .to_string();

    let analysis = state.signal_store.analyze(&pair).await?;
    let precision = state.config.signal.price_precision;

    Ok(Json(AnalyzeResponse {
        pair: analysis.pair,
        timeframes: analysis.timeframes,
        signal: analysis.signal.to_view(precision),
        history_id: analysis.entry.id,
        recorded_at: analysis.entry.recorded_at,
        stats: analysis.stats,
    }))
}
