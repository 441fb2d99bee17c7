pub mod analyze;
pub mod health;
pub mod history;
pub mod pairs;

use crate::AppState;
use axum::Router;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(pairs::router())
        .merge(analyze::router())
        .merge(history::router())
}
