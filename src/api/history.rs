//! Signal history endpoints.

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::types::{HistoryEntryView, HistoryStats};
use crate::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryResponse {
    /// Newest first.
    pub entries: Vec<HistoryEntryView>,
    pub stats: HistoryStats,
    pub capacity: usize,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/history", get(get_history))
        .route("/history/:id", get(get_entry))
}

/// Get recorded signals and statistics.
async fn get_history(State(state): State<AppState>) -> Json<HistoryResponse> {
    let precision = state.config.signal.price_precision;
    let (entries, stats) = state.history.snapshot();

    Json(HistoryResponse {
        entries: entries.iter().map(|e| e.to_view(precision)).collect(),
        stats,
        capacity: state.history.capacity(),
    })
}

/// Get a single retained entry.
async fn get_entry(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<HistoryEntryView>> {
    state
        .history
        .entries()
        .iter()
        .find(|e| e.id == id)
        .map(|e| Json(e.to_view(state.config.signal.price_precision)))
        .ok_or_else(|| AppError::NotFound(format!("No history entry {}", id)))
}
