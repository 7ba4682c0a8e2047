use axum::Json;
use serde::Serialize;

pub const SERVICE_NAME: &str = "Customer Support Assistant";

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    service: String,
}

/// Liveness only; worker agents are not probed.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: SERVICE_NAME.to_string(),
    })
}
