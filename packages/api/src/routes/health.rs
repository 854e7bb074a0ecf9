use axum::{http::StatusCode, routing::get, Json, Router};
use chrono::Utc;
use serde_json::{json, Value};

use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/status", get(status))
}

/// Health check endpoint to verify API status
pub async fn health_check() -> (StatusCode, String) {
    (StatusCode::OK, "Healthy!".to_string())
}

pub async fn status() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}
