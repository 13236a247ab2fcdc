use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
    pub message: &'static str,
}

/// GET /api/health - liveness, never gated by auth
pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "UP",
        timestamp: chrono::Utc::now().timestamp_millis(),
        message: "News API is running",
    })
}
