//! 健康检查

use axum::response::Json;

use crate::translation::config::constants::SERVICE_NAME;
use crate::web::types::HealthResponse;

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: SERVICE_NAME.to_string(),
    })
}
