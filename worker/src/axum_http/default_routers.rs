use axum::{Json, http::StatusCode, response::IntoResponse};
use backend::axum_http::error_responses::error_response;
use serde_json::json;

pub async fn not_found() -> impl IntoResponse {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

pub async fn health_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({ "status": "ok", "component": "worker" })),
    )
}
