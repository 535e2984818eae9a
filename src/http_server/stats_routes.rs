//! Summary statistics route

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use chrono::Utc;

use super::errors::ApiResult;
use super::state::AppState;
use crate::gateway::{summarize, SummaryStats};

/// Create stats routes
pub fn stats_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/summary", get(summary_handler))
        .with_state(state)
}

async fn summary_handler(State(state): State<Arc<AppState>>) -> ApiResult<Json<SummaryStats>> {
    Ok(Json(summarize(&state.gateway, Utc::now())?))
}
