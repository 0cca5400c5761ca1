use axum::Json;
use serde_json::{json, Value};

/// GET /health
/// Liveness/readiness signal; no business logic.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "curriculum-api"
    }))
}
