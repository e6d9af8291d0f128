use axum::Json;
use chrono::Utc;

use crate::features::hazards::dtos::HealthResponseDto;

/// Service health probe
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponseDto)
    ),
    tag = "health"
)]
pub async fn health_check() -> Json<HealthResponseDto> {
    Json(HealthResponseDto {
        status: "OK".to_string(),
        timestamp: Utc::now().to_rfc3339(),
    })
}
