//! Liveness and diagnostic routes
//!
//! Neither route fails: storage problems are reported as status strings.

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use super::errors::truncate;
use super::state::AppState;

/// Collections listed by the diagnostic report
pub const MAX_LISTED_COLLECTIONS: usize = 20;

#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub message: String,
}

/// Storage diagnostic report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiagnosticReport {
    pub backend: String,
    pub database: String,
    pub database_url: Option<String>,
    pub database_name: Option<String>,
    pub connection_status: String,
    pub collections: Vec<String>,
}

/// Create health routes
pub fn health_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/test", get(diagnostics_handler))
        .with_state(state)
}

async fn root_handler() -> Json<RootResponse> {
    Json(RootResponse {
        message: "SimpleCRM Pro backend is running".to_string(),
    })
}

async fn diagnostics_handler(State(state): State<Arc<AppState>>) -> Json<DiagnosticReport> {
    Json(diagnose(&state))
}

/// Probe the store and describe what was found
pub fn diagnose(state: &AppState) -> DiagnosticReport {
    let mut report = DiagnosticReport {
        backend: "✅ Running".to_string(),
        database: "❌ Not Available".to_string(),
        database_url: None,
        database_name: None,
        connection_status: "Not Connected".to_string(),
        collections: Vec::new(),
    };

    let store = match state.gateway.store() {
        Ok(store) => store,
        Err(_) => {
            report.database = "⚠️ Available but not initialized".to_string();
            return report;
        }
    };

    report.database = "✅ Available".to_string();
    report.database_url = Some(if state.database_url_set {
        "✅ Set".to_string()
    } else {
        "❌ Not Set".to_string()
    });
    report.database_name = Some(
        state
            .database_name
            .clone()
            .unwrap_or_else(|| store.name().to_string()),
    );
    report.connection_status = "Connected".to_string();

    match store.list_collection_names() {
        Ok(mut names) => {
            names.truncate(MAX_LISTED_COLLECTIONS);
            report.collections = names;
            report.database = "✅ Connected & Working".to_string();
        }
        Err(e) => {
            report.database = format!("⚠️ Connected but Error: {}", truncate(&e.to_string(), 80));
        }
    }

    report
}
