use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Serialize;

pub const BANNER: &str = "Insurance Call Analyst API is running.";

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
}

pub async fn home_handler() -> &'static str {
    BANNER
}

pub async fn health_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
        }),
    )
}
