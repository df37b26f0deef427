use axum::{Json, response::IntoResponse};

pub async fn health_check_route() -> impl IntoResponse {
    Json(serde_json::json!({"status": "ok"}))
}
