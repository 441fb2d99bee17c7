//! Tradable instrument listing.

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct PairsResponse {
    pub pairs: Vec<String>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/pairs", get(list_pairs))
}

/// List the configured pairs.
async fn list_pairs(State(state): State<AppState>) -> Json<PairsResponse> {
    Json(PairsResponse {
        pairs: state.config.pairs.clone(),
    })
}
