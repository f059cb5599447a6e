use axum::response::Redirect;
use axum::Json;
use serde_json::{json, Value};

pub const FRONTEND_INDEX: &str = "/static/index.html";

/// GET / when no frontend is mounted.
pub async fn landing_handler() -> Json<Value> {
    Json(json!({ "message": "Hello from AI Job Aggregator API" }))
}

/// GET / when `STATIC_DIR` is set.
pub async fn frontend_redirect() -> Redirect {
    Redirect::to(FRONTEND_INDEX)
}
