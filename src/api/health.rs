use axum::response::Json;
use serde_json::{Value, json};

pub async fn health() -> Json<Value> {
    Json(json!({
        "service": env!("CARGO_PKG_NAME"),
        "status": "waiting_for_callback",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
