use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns service status, the loaded domains, and the live session count.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let domains: Vec<&str> = state.catalog.domains().map(|d| d.as_str()).collect();
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "refiner-api",
        "domains": domains,
        "active_sessions": state.sessions.count().await
    }))
}
