use axum::Json;
use serde_json::{Value, json};

/// Unauthenticated liveness probe.
pub async fn health_handler() -> Json<Value> {
    Json(json!({ "ok": true }))
}
