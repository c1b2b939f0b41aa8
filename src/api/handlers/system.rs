use axum::response::Json;
use serde_json::{json, Value};

pub const HOME_TEXT: &str = "Hello from Node.js!";
pub const ABOUT_TEXT: &str = "This API is created by CB!";

/// Handler for GET /
pub async fn home() -> &'static str {
    HOME_TEXT
}

/// Handler for GET /about
pub async fn about() -> &'static str {
    ABOUT_TEXT
}

/// Handler for GET /health - liveness only, the store is not touched
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": crate::VERSION,
        "timestamp": chrono::Utc::now().timestamp(),
    }))
}
